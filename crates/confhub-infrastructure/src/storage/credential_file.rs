//! File-backed credential storage.
//!
//! Entries live in `session.toml` under the confhub config directory. The
//! file is owner-only and is removed once its last entry is removed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use confhub_core::Result;
use confhub_core::session::CredentialStore;

use super::atomic_toml::AtomicTomlFile;
use crate::paths::ConfhubPaths;

type Entries = BTreeMap<String, String>;

/// [`CredentialStore`] persisted to a TOML file.
pub struct FileCredentialStore {
    file: AtomicTomlFile<Entries>,
}

impl FileCredentialStore {
    /// Uses the default session file location.
    pub fn new(paths: &ConfhubPaths) -> Self {
        Self::with_path(paths.session_file())
    }

    /// Creates a store with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    fn load_entries(&self) -> Result<Entries> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_entries()?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file.update(Entries::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })?;
        tracing::debug!(key, path = %self.file.path().display(), "credential entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.file.update_or_delete(Entries::new(), |entries| {
            entries.remove(key);
            Ok(!entries.is_empty())
        })?;
        tracing::debug!(key, "credential entry removed");
        Ok(())
    }
}
