//! TOML catalog file: `[ui]` settings plus an ordered `[[apps]]` table.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use shared::domain::{Activation, ActivationKind, AppId, Descriptor, ModuleRef};
use tracing::warn;
use url::Url;

use crate::{Registry, RegistryError};

pub const DEFAULT_CARDS_PER_ROW: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSettings {
    pub page_title: String,
    pub cards_per_row: usize,
    pub about_title: String,
    pub about_body: Vec<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            page_title: "Reporting Cockpit".into(),
            cards_per_row: DEFAULT_CARDS_PER_ROW,
            about_title: "About this cockpit".into(),
            about_body: vec![
                "A single entry point for the team's reporting applications.".into(),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    ui: UiSettings,
    #[serde(default)]
    apps: Vec<AppRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppRecord {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    category: String,
    kind: ActivationKind,
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    manages_own_navigation: bool,
}

impl AppRecord {
    fn into_descriptor(self) -> Result<Descriptor, RegistryError> {
        let module = self.module.filter(|m| !m.trim().is_empty());
        let url = self.url.filter(|u| !u.trim().is_empty());

        let activation = match self.kind {
            ActivationKind::Embedded => {
                if url.is_some() {
                    return Err(RegistryError::InvalidRecord {
                        app_id: self.id,
                        reason: "embedded apps must not declare a url".into(),
                    });
                }
                let module = module.ok_or_else(|| RegistryError::InvalidRecord {
                    app_id: self.id.clone(),
                    reason: "embedded apps need a module reference".into(),
                })?;
                Activation::Embedded {
                    module: ModuleRef(module),
                }
            }
            ActivationKind::External => {
                if module.is_some() {
                    return Err(RegistryError::InvalidRecord {
                        app_id: self.id,
                        reason: "external apps must not declare a module".into(),
                    });
                }
                let url = match url {
                    Some(raw) => Some(Url::parse(raw.trim()).map_err(|source| {
                        RegistryError::InvalidUrl {
                            app_id: self.id.clone(),
                            url: raw.clone(),
                            source,
                        }
                    })?),
                    None => {
                        warn!(app_id = %self.id, "external app has no url configured");
                        None
                    }
                };
                Activation::External { url }
            }
        };

        Ok(Descriptor {
            id: AppId(self.id),
            name: self.name,
            description: self.description,
            icon: self.icon,
            category: self.category,
            activation,
            manages_own_navigation: self.manages_own_navigation,
        })
    }
}

/// Parsed catalog configuration: the registry plus shell presentation settings.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub ui: UiSettings,
    pub registry: Registry,
}

impl Catalog {
    pub fn from_toml_str(raw: &str) -> Result<Self, RegistryError> {
        let file: CatalogFile = toml::from_str(raw)?;
        if file.ui.cards_per_row == 0 {
            return Err(RegistryError::InvalidUi(
                "cards_per_row must be at least 1".into(),
            ));
        }

        let descriptors = file
            .apps
            .into_iter()
            .map(AppRecord::into_descriptor)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ui: file.ui,
            registry: Registry::new(descriptors)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
