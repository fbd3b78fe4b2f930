use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::{ConfigError, DataServiceConfig};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "series_browser.toml";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl Settings {
    pub fn data_service_config(&self) -> Result<DataServiceConfig, ConfigError> {
        let config = DataServiceConfig::new(&self.endpoint)?;
        Ok(match self.request_timeout_seconds {
            0 => config,
            seconds => config.with_request_timeout(Duration::from_secs(seconds)),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    request_timeout_seconds: Option<u64>,
}

/// Defaults, then the config file, then environment. An explicitly named
/// config file must exist; the default one is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => Some(raw),
        Err(_) if !required => None,
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read config file '{}'", path.display())
            })
        }
    };

    resolve_settings(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid config file '{}'", path.display()))
}

fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.endpoint {
            settings.endpoint = v;
        }
        if let Some(v) = file_cfg.request_timeout_seconds {
            settings.request_timeout_seconds = v;
        }
    }

    if let Some(v) = env("DATA_SERVICE_URL") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
