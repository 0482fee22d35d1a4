//! Session view state.

use shared::{
    domain::AppId,
    protocol::{ViewPosition, ViewStateSnapshot},
};

/// Where the session currently is. About, app and home are one enum so at
/// most one of them can ever be active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Home,
    About,
    EmbeddedApp(AppId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    position: Position,
    filter_category: Option<String>,
}

impl ViewState {
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn current_app(&self) -> Option<&AppId> {
        match &self.position {
            Position::EmbeddedApp(id) => Some(id),
            _ => None,
        }
    }

    pub fn filter_category(&self) -> Option<&str> {
        self.filter_category.as_deref()
    }

    pub fn is_home(&self) -> bool {
        self.position == Position::Home
    }

    pub(crate) fn open_app(&mut self, id: AppId) {
        self.position = Position::EmbeddedApp(id);
    }

    pub(crate) fn open_about(&mut self) {
        self.position = Position::About;
    }

    pub(crate) fn filter_home(&mut self, category: Option<String>) {
        self.position = Position::Home;
        self.filter_category = category;
    }

    pub fn snapshot(&self, last_handoff: Option<&AppId>) -> ViewStateSnapshot {
        let position = match self.position {
            Position::Home => ViewPosition::Home,
            Position::About => ViewPosition::About,
            Position::EmbeddedApp(_) => ViewPosition::EmbeddedApp,
        };
        ViewStateSnapshot {
            position,
            current_app: self.current_app().cloned(),
            filter_category: self.filter_category.clone(),
            last_handoff: last_handoff.cloned(),
        }
    }
}
