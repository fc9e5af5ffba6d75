//! Unified path management for confhub files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/confhub/           # Config directory (platform default)
//! ├── config.toml              # Client configuration
//! └── session.toml             # Persisted token and user entries
//! ```
//!
//! The directory can be relocated with `CONFHUB_CONFIG_DIR`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CONFHUB_CONFIG_DIR";

const APP_DIR: &str = "confhub";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved locations of confhub files.
#[derive(Debug, Clone)]
pub struct ConfhubPaths {
    config_dir: PathBuf,
}

impl ConfhubPaths {
    /// Resolves paths.
    ///
    /// Priority:
    /// 1. `base_path`, when given
    /// 2. `CONFHUB_CONFIG_DIR`
    /// 3. `<platform config dir>/confhub`
    pub fn new(base_path: Option<&Path>) -> Result<Self, PathError> {
        if let Some(base) = base_path {
            return Ok(Self::with_dir(base.to_path_buf()));
        }

        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_dir(PathBuf::from(dir)));
        }

        dirs::config_dir()
            .map(|dir| Self::with_dir(dir.join(APP_DIR)))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Uses `config_dir` as-is.
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the persisted session entries.
    ///
    /// Holds a bearer token; the file is written with mode 600 on Unix.
    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.toml")
    }
}
