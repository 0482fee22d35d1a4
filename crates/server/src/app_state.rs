use crate::sessions::SessionStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sessions: SessionStore,
}
