//! Render-cycle output. The shell turns a [`RenderedPage`] into markup.

use module_loader::{LoadError, LoadErrorKind, Page, RenderFailure};
use registry::Registry;
use shared::{
    domain::{AppId, Descriptor},
    protocol::{CatalogEntrySummary, Notice, ViewPosition},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    /// `None` while the active app manages its own navigation.
    pub navigation: Option<NavigationPanel>,
    pub notices: Vec<Notice>,
    pub body: PageBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPanel {
    pub position: ViewPosition,
    pub categories: Vec<String>,
    pub active_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    About { title: String, paragraphs: Vec<String> },
    App { header: AppHeader, page: Page },
    AppFailed { header: AppHeader, failure: AppFailure },
    Catalog(CatalogView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppHeader {
    pub app_id: AppId,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl From<&Descriptor> for AppHeader {
    fn from(descriptor: &Descriptor) -> Self {
        Self {
            app_id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            icon: descriptor.icon.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppFailure {
    Load(LoadError),
    Render(RenderFailure),
}

impl PartialEq for AppFailure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AppFailure::Load(a), AppFailure::Load(b)) => a.kind == b.kind && a.detail == b.detail,
            (AppFailure::Render(a), AppFailure::Render(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AppFailure {}

impl AppFailure {
    pub fn headline(&self, app_name: &str) -> String {
        match self {
            AppFailure::Load(_) => format!("Could not load application: {app_name}"),
            AppFailure::Render(failure) => format!("Error running {app_name}: {failure}"),
        }
    }

    pub fn hint(&self) -> String {
        match self {
            AppFailure::Load(err) => match err.kind {
                LoadErrorKind::MissingEntryPoint => format!(
                    "Module '{}' was found but exposes no entry point.",
                    err.detail
                ),
                LoadErrorKind::ResolutionFailed => match &err.reason {
                    Some(reason) => format!("Module '{}' could not be resolved: {reason}", err.detail),
                    None => format!("Module '{}' is not registered with the shell.", err.detail),
                },
            },
            AppFailure::Render(_) => {
                "Please check the application and try again.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub filter: Option<String>,
    pub show_clear_filter: bool,
    pub cards_per_row: usize,
    pub sections: Vec<CatalogSection>,
}

impl CatalogView {
    /// Card ids in display order, across all sections.
    pub fn app_ids(&self) -> Vec<&AppId> {
        self.sections
            .iter()
            .flat_map(|section| section.rows.iter().flatten())
            .map(|card| &card.app_id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSection {
    pub category: String,
    pub rows: Vec<Vec<CatalogEntrySummary>>,
}

pub(crate) fn build_catalog(
    registry: &Registry,
    filter: Option<&str>,
    cards_per_row: usize,
) -> CatalogView {
    let cards_per_row = cards_per_row.max(1);
    let sections = registry
        .grouped_by_category()
        .into_iter()
        .filter(|group| filter.map_or(true, |wanted| group.category == wanted))
        .map(|group| CatalogSection {
            category: group.category.to_string(),
            rows: group
                .apps
                .chunks(cards_per_row)
                .map(|row| row.iter().map(|d| CatalogEntrySummary::from(*d)).collect())
                .collect(),
        })
        .collect();

    CatalogView {
        filter: filter.map(str::to_string),
        show_clear_filter: filter.is_some(),
        cards_per_row,
        sections,
    }
}
