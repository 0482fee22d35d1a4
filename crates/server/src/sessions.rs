//! Cookie-keyed browser sessions, each owning one [`Dispatcher`].

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dispatcher::{Dispatcher, ShellContext};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

pub(crate) const SESSION_COOKIE: &str = "shell_session";

/// One session's dispatcher. The lock is held for a whole interaction, so a
/// session never runs two interactions at once.
pub(crate) type SessionHandle = Arc<Mutex<Dispatcher>>;

struct SessionEntry {
    dispatcher: SessionHandle,
    last_seen: Instant,
}

#[derive(Clone)]
pub(crate) struct SessionStore {
    ctx: ShellContext,
    idle_timeout: Duration,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub(crate) fn new(ctx: ShellContext, idle_timeout: Duration) -> Self {
        Self {
            ctx,
            idle_timeout,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Returns the caller's session, starting a new one (and setting the
    /// cookie) when the cookie is absent, unknown, or idle too long.
    pub(crate) async fn session(&self, jar: CookieJar) -> (CookieJar, SessionHandle) {
        let now = Instant::now();
        let requested = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), "evicted idle sessions");
        }

        if let Some(entry) = requested.and_then(|id| sessions.get_mut(&id)) {
            entry.last_seen = now;
            return (jar, entry.dispatcher.clone());
        }

        let id = Uuid::new_v4();
        let dispatcher = Arc::new(Mutex::new(Dispatcher::new(self.ctx.clone())));
        sessions.insert(
            id,
            SessionEntry {
                dispatcher: dispatcher.clone(),
                last_seen: now,
            },
        );
        info!(session = %id, active = sessions.len(), "started session");

        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), dispatcher)
    }

    #[cfg(test)]
    pub(crate) async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use module_loader::ModuleCatalog;
    use registry::{Registry, UiSettings};
    use shared::protocol::NavEvent;

    fn store(idle_timeout: Duration) -> SessionStore {
        let ctx = ShellContext {
            registry: Arc::new(Registry::default()),
            ui: Arc::new(UiSettings::default()),
            modules: Arc::new(ModuleCatalog::new()),
        };
        SessionStore::new(ctx, idle_timeout)
    }

    fn cookie_value(jar: &CookieJar) -> String {
        jar.get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .expect("session cookie")
    }

    #[tokio::test]
    async fn known_cookie_resumes_the_same_session() {
        let store = store(Duration::from_secs(60));
        let (jar, first) = store.session(CookieJar::new()).await;
        let id = cookie_value(&jar);

        first.lock().await.dispatch(NavEvent::OpenAbout).expect("about");

        let (_, second) = store
            .session(CookieJar::new().add(Cookie::new(SESSION_COOKIE, id)))
            .await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn unknown_or_malformed_cookie_starts_fresh_session() {
        let store = store(Duration::from_secs(60));
        let (jar, _) = store
            .session(CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not-a-uuid")))
            .await;
        assert_ne!(cookie_value(&jar), "not-a-uuid");

        let stale = Uuid::new_v4().to_string();
        let (jar, _) = store
            .session(CookieJar::new().add(Cookie::new(SESSION_COOKIE, stale.clone())))
            .await;
        assert_ne!(cookie_value(&jar), stale);
        assert_eq!(store.active_sessions().await, 2);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = store(Duration::ZERO);
        let (jar, first) = store.session(CookieJar::new()).await;
        let id = cookie_value(&jar);

        let (jar, second) = store
            .session(CookieJar::new().add(Cookie::new(SESSION_COOKIE, id.clone())))
            .await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_ne!(cookie_value(&jar), id);
        assert_eq!(store.active_sessions().await, 1);
    }
}
