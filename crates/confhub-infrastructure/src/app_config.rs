//! Client configuration (`config.toml`).
//!
//! Values are resolved from, in increasing priority: built-in defaults, the
//! config file, environment variables. Command-line flags are applied by the
//! binary on top of the result.

use std::path::Path;
use std::time::Duration;

use confhub_core::{ConfhubError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::ConfhubPaths;

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "CONFHUB_API_URL";

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Lines shown before a preview is cut; `0` shows everything.
    pub max_lines: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_lines: confhub_core::config::DEFAULT_PREVIEW_LINES,
        }
    }
}

impl AppConfig {
    /// Loads `config.toml` and applies process environment overrides.
    pub fn load(paths: &ConfhubPaths) -> Result<Self> {
        let config = Self::load_file(&paths.config_file())?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Loads a config file; a missing file yields the defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfhubError::config(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides looked up through `lookup` (normally `std::env::var`).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfhubError::config(format!(
                "api.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfhubError::config("api.timeout_secs must be positive"));
        }
        Ok(())
    }
}
