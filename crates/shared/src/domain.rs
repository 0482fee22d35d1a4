use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

macro_rules! key_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

key_newtype!(AppId);
key_newtype!(ModuleRef);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Embedded,
    External,
}

impl ActivationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivationKind::Embedded => "embedded",
            ActivationKind::External => "external",
        }
    }
}

/// How a catalog entry is brought up when the user selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// Rendered in-process inside the shell chrome.
    Embedded { module: ModuleRef },
    /// Handed off to an outside resource. A missing `url` is a configuration
    /// error reported when the entry is selected.
    External {
        #[serde(default)]
        url: Option<Url>,
    },
}

impl Activation {
    pub fn kind(&self) -> ActivationKind {
        match self {
            Activation::Embedded { .. } => ActivationKind::Embedded,
            Activation::External { .. } => ActivationKind::External,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: AppId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub activation: Activation,
    #[serde(default)]
    pub manages_own_navigation: bool,
}

impl Descriptor {
    pub fn activation_kind(&self) -> ActivationKind {
        self.activation.kind()
    }

    pub fn module_reference(&self) -> Option<&ModuleRef> {
        match &self.activation {
            Activation::Embedded { module } => Some(module),
            Activation::External { .. } => None,
        }
    }

    pub fn external_url(&self) -> Option<&Url> {
        match &self.activation {
            Activation::External { url } => url.as_ref(),
            Activation::Embedded { .. } => None,
        }
    }
}
