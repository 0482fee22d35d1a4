use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub catalog_path: PathBuf,
    pub session_idle_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8501".into(),
            catalog_path: PathBuf::from("catalog.toml"),
            session_idle_seconds: 30 * 60,
        }
    }
}

impl Settings {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_seconds)
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("shell.toml").ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the `shell.toml` table, then environment overrides.
pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr").and_then(|v| v.as_str()) {
                    settings.server_bind = v.to_string();
                }
                if let Some(v) = file_cfg.get("catalog_path").and_then(|v| v.as_str()) {
                    settings.catalog_path = PathBuf::from(v);
                }
                if let Some(v) = file_cfg
                    .get("session_idle_seconds")
                    .and_then(|v| v.as_integer())
                    .and_then(|v| u64::try_from(v).ok())
                {
                    settings.session_idle_seconds = v;
                }
            }
            Err(error) => warn!(%error, "ignoring unreadable shell.toml"),
        }
    }

    if let Some(v) = env("SHELL_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("SHELL_CATALOG") {
        settings.catalog_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = PathBuf::from(v);
    }

    if let Some(v) = env("APP__SESSION_IDLE_SECONDS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.session_idle_seconds = parsed,
            Err(_) => warn!(value = %v, "APP__SESSION_IDLE_SECONDS is not a number"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
