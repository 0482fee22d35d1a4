use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{ActivationKind, AppId, Descriptor};

/// Discrete user interactions the navigation dispatcher reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum NavEvent {
    SelectApp { app_id: AppId },
    SelectCategory { category: String },
    ClearCategoryFilter,
    OpenAbout,
    ReturnHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPosition {
    Home,
    About,
    EmbeddedApp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStateSnapshot {
    pub position: ViewPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_app: Option<AppId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_handoff: Option<AppId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchOutcomeDto {
    Redraw,
    Handoff { app_id: AppId, url: Url },
    Rejected { notice: Notice },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub outcome: DispatchOutcomeDto,
    pub state: ViewStateSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntrySummary {
    pub app_id: AppId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub kind: ActivationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

impl From<&Descriptor> for CatalogEntrySummary {
    fn from(descriptor: &Descriptor) -> Self {
        Self {
            app_id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            icon: descriptor.icon.clone(),
            kind: descriptor.activation_kind(),
            url: descriptor.external_url().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub apps: Vec<CatalogEntrySummary>,
}
