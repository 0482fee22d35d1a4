//! Static application registry: descriptor lookup and category grouping.

use std::{collections::HashMap, path::PathBuf};

use shared::domain::{AppId, Descriptor};
use thiserror::Error;

mod catalog;

pub use catalog::{Catalog, UiSettings, DEFAULT_CARDS_PER_ROW};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("application '{0}' is not registered")]
    NotFound(AppId),
    #[error("application id '{0}' is declared more than once")]
    DuplicateId(AppId),
    #[error("record named '{name}' has an empty id")]
    EmptyId { name: String },
    #[error("application '{app_id}' has an empty {field}")]
    EmptyField { app_id: String, field: &'static str },
    #[error("application '{app_id}' is misconfigured: {reason}")]
    InvalidRecord { app_id: String, reason: String },
    #[error("application '{app_id}' has an invalid url '{url}': {source}")]
    InvalidUrl {
        app_id: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid ui settings: {0}")]
    InvalidUi(String),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Descriptors sharing one category, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub apps: Vec<&'a Descriptor>,
}

/// Closed, immutable set of catalog entries keyed by [`AppId`].
///
/// Declaration order is significant: it drives both category order and the
/// order of apps within a category.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    apps: Vec<Descriptor>,
    index: HashMap<AppId, usize>,
}

impl Registry {
    pub fn new(apps: Vec<Descriptor>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(apps.len());
        for (position, descriptor) in apps.iter().enumerate() {
            if descriptor.id.as_str().trim().is_empty() {
                return Err(RegistryError::EmptyId {
                    name: descriptor.name.clone(),
                });
            }
            if descriptor.category.trim().is_empty() {
                return Err(RegistryError::EmptyField {
                    app_id: descriptor.id.to_string(),
                    field: "category",
                });
            }
            if index.insert(descriptor.id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateId(descriptor.id.clone()));
            }
        }
        Ok(Self { apps, index })
    }

    pub fn get(&self, id: &AppId) -> Result<&Descriptor, RegistryError> {
        self.index
            .get(id)
            .map(|&position| &self.apps[position])
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    pub fn all(&self) -> &[Descriptor] {
        &self.apps
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn grouped_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for descriptor in &self.apps {
            let category = descriptor.category.as_str();
            let slot = *slots.entry(category).or_insert_with(|| {
                groups.push(CategoryGroup {
                    category,
                    apps: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].apps.push(descriptor);
        }
        groups
    }

    /// Category keys in first-occurrence order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for descriptor in &self.apps {
            let category = descriptor.category.as_str();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.apps.iter().any(|d| d.category == category)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
