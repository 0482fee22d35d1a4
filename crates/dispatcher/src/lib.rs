//! Navigation dispatcher: owns one session's view state, applies navigation
//! events to it, and renders the current view.
//!
//! Each interaction is a discrete [`NavEvent`] applied with
//! [`Dispatcher::dispatch`], followed by a full [`Dispatcher::render`] of
//! whatever the state now says. Failures raised by embedded units are turned
//! into inline diagnostics at the render boundary; registry lookups for ids
//! that do not exist are hard errors.

use std::sync::Arc;

use module_loader::{ModuleCatalog, ModuleLoader, Page};
use registry::{Registry, RegistryError, UiSettings};
use shared::{
    domain::{Activation, AppId, Descriptor},
    protocol::{DispatchOutcomeDto, NavEvent, Notice, ViewStateSnapshot},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

mod state;
mod view;

pub use state::{Position, ViewState};
pub use view::{
    AppFailure, AppHeader, CatalogSection, CatalogView, NavigationPanel, PageBody, RenderedPage,
};

/// Read-only collaborators shared by every session.
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub registry: Arc<Registry>,
    pub ui: Arc<UiSettings>,
    pub modules: Arc<ModuleCatalog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State changed; the page should be redrawn.
    Redraw,
    /// External activation. View state is untouched.
    Handoff { app_id: AppId, url: Url },
    /// The event could not be honoured; the notice is also queued for the
    /// next render. View state is untouched.
    Rejected(Notice),
}

impl From<DispatchOutcome> for DispatchOutcomeDto {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Redraw => DispatchOutcomeDto::Redraw,
            DispatchOutcome::Handoff { app_id, url } => DispatchOutcomeDto::Handoff { app_id, url },
            DispatchOutcome::Rejected(notice) => DispatchOutcomeDto::Rejected { notice },
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("category '{0}' is not in the catalog")]
    UnknownCategory(String),
}

#[derive(Debug)]
pub struct Dispatcher {
    ctx: ShellContext,
    loader: ModuleLoader,
    state: ViewState,
    last_handoff: Option<AppId>,
    pending_notices: Vec<Notice>,
}

impl Dispatcher {
    /// Fresh session: home page, no filter, empty loader cache.
    pub fn new(ctx: ShellContext) -> Self {
        let loader = ModuleLoader::new(ctx.modules.clone());
        Self {
            ctx,
            loader,
            state: ViewState::default(),
            last_handoff: None,
            pending_notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn last_handoff(&self) -> Option<&AppId> {
        self.last_handoff.as_ref()
    }

    pub fn snapshot(&self) -> ViewStateSnapshot {
        self.state.snapshot(self.last_handoff.as_ref())
    }

    pub fn dispatch(&mut self, event: NavEvent) -> Result<DispatchOutcome, DispatchError> {
        debug!(?event, "dispatching navigation event");
        match event {
            NavEvent::SelectApp { app_id } => self.select_app(app_id),
            NavEvent::SelectCategory { category } => {
                if !self.ctx.registry.contains_category(&category) {
                    return Err(DispatchError::UnknownCategory(category));
                }
                info!(%category, "category filter applied");
                self.state.filter_home(Some(category));
                Ok(DispatchOutcome::Redraw)
            }
            NavEvent::ClearCategoryFilter => {
                self.state.filter_home(None);
                Ok(DispatchOutcome::Redraw)
            }
            NavEvent::OpenAbout => {
                self.state.open_about();
                Ok(DispatchOutcome::Redraw)
            }
            NavEvent::ReturnHome => {
                self.state.filter_home(None);
                Ok(DispatchOutcome::Redraw)
            }
        }
    }

    fn select_app(&mut self, app_id: AppId) -> Result<DispatchOutcome, DispatchError> {
        let descriptor = self.ctx.registry.get(&app_id)?;
        match &descriptor.activation {
            Activation::Embedded { .. } => {
                info!(%app_id, "opening embedded app");
                self.state.open_app(app_id);
                Ok(DispatchOutcome::Redraw)
            }
            Activation::External { url: Some(url) } => {
                info!(%app_id, %url, "handing off to external app");
                let url = url.clone();
                self.last_handoff = Some(app_id.clone());
                Ok(DispatchOutcome::Handoff { app_id, url })
            }
            Activation::External { url: None } => {
                warn!(%app_id, "external app selected without a configured url");
                let notice = Notice::error(format!("No URL configured for {}", descriptor.name));
                // Repeats of a pending notice collapse into one.
                if !self.pending_notices.contains(&notice) {
                    self.pending_notices.push(notice.clone());
                }
                Ok(DispatchOutcome::Rejected(notice))
            }
        }
    }

    /// One render cycle. Precedence is about, then the open app, then home.
    pub fn render(&mut self) -> RenderedPage {
        let mut show_navigation = true;
        let body = match self.state.position().clone() {
            Position::About => PageBody::About {
                title: self.ctx.ui.about_title.clone(),
                paragraphs: self.ctx.ui.about_body.clone(),
            },
            Position::EmbeddedApp(app_id) => match self.ctx.registry.get(&app_id) {
                Ok(descriptor) => {
                    let descriptor = descriptor.clone();
                    show_navigation = !descriptor.manages_own_navigation;
                    self.render_app(&descriptor)
                }
                Err(err) => {
                    error!(%app_id, %err, "open app vanished from the registry; returning home");
                    self.state.filter_home(None);
                    self.render_catalog()
                }
            },
            Position::Home => self.render_catalog(),
        };

        RenderedPage {
            title: self.ctx.ui.page_title.clone(),
            navigation: show_navigation.then(|| self.navigation_panel()),
            notices: std::mem::take(&mut self.pending_notices),
            body,
        }
    }

    fn render_app(&mut self, descriptor: &Descriptor) -> PageBody {
        let header = AppHeader::from(descriptor);
        let Some(reference) = descriptor.module_reference() else {
            // Only embedded apps are ever opened.
            return self.render_catalog();
        };

        let unit = match self.loader.load(reference) {
            Ok(unit) => unit,
            Err(err) => {
                return PageBody::AppFailed {
                    header,
                    failure: AppFailure::Load(err),
                }
            }
        };

        let mut page = Page::new();
        match unit.run(&mut page) {
            Ok(()) => PageBody::App { header, page },
            Err(failure) => {
                warn!(app_id = %descriptor.id, %failure, "embedded app failed while rendering");
                PageBody::AppFailed {
                    header,
                    failure: AppFailure::Render(failure),
                }
            }
        }
    }

    fn render_catalog(&self) -> PageBody {
        PageBody::Catalog(view::build_catalog(
            &self.ctx.registry,
            self.state.filter_category(),
            self.ctx.ui.cards_per_row,
        ))
    }

    fn navigation_panel(&self) -> NavigationPanel {
        NavigationPanel {
            position: self.snapshot().position,
            categories: self
                .ctx
                .registry
                .categories()
                .into_iter()
                .map(str::to_string)
                .collect(),
            active_category: self.state.filter_category().map(str::to_string),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
