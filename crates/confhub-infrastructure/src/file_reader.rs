//! Reading config files selected for upload.

use std::path::Path;

use confhub_core::config::ConfigFile;
use confhub_core::{ConfhubError, Result};

/// Reads a file from disk into a [`ConfigFile`] named after its file name.
pub async fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ConfhubError::io(format!("{} is not a file path", path.display())))?;

    let content = tokio::fs::read(path).await.map_err(|e| {
        ConfhubError::io(format!("failed to read {}: {}", path.display(), e))
    })?;

    tracing::debug!(file = %name, bytes = content.len(), "read config file");
    Ok(ConfigFile::new(name, content))
}
