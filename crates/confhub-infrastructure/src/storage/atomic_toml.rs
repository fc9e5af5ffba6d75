//! Atomic TOML file operations.
//!
//! Writes go through a temporary file, fsync and rename so a crash never
//! leaves a half-written file; read-modify-write cycles hold an exclusive lock.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use confhub_core::ConfhubError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Failure of an atomic TOML operation.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<AtomicTomlError> for ConfhubError {
    fn from(e: AtomicTomlError) -> Self {
        match e {
            AtomicTomlError::Parse { .. } | AtomicTomlError::Serialize(_) => {
                ConfhubError::Serialization {
                    format: "TOML".to_string(),
                    message: e.to_string(),
                }
            }
            AtomicTomlError::Io { .. } | AtomicTomlError::Lock { .. } => {
                ConfhubError::io(e.to_string())
            }
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AtomicTomlError + '_ {
    move |source| AtomicTomlError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A TOML document on disk, replaced as a whole on every save.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    private: bool,
    _marker: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _marker: PhantomData,
        }
    }

    /// Restricts saved files to the owner (mode 600 on Unix).
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A missing or blank file yields `None`.
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.path)(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes `data` to a sibling temp file, syncs it and renames it over the target.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let rendered = toml::to_string_pretty(data)?;
        let dir = self.parent_dir()?;
        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let tmp_path = self.temp_path();
        let mut tmp = File::create(&tmp_path).map_err(io_error(&tmp_path))?;
        if self.private {
            restrict_permissions(&tmp_path).map_err(io_error(&tmp_path))?;
        }
        tmp.write_all(rendered.as_bytes())
            .and_then(|_| tmp.sync_all())
            .map_err(io_error(&tmp_path))?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))
    }

    /// Locked read-modify-write.
    ///
    /// `f` receives the current document, or `default_value` when there is
    /// none; nothing is written if `f` fails.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)
    }

    /// Locked read-modify-write that may remove the file.
    ///
    /// `f` returns whether the document should be kept. When it returns
    /// `false` the file is deleted instead of rewritten, with no other writer
    /// able to slip in between the read and the removal.
    pub fn update_or_delete<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<bool, AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default_value);
        if f(&mut data)? {
            self.save(&data)
        } else {
            self.remove_file()
        }
    }

    /// Removes the file under the lock. A missing file is not an error.
    pub fn delete(&self) -> Result<(), AtomicTomlError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.remove_file()
    }

    fn remove_file(&self) -> Result<(), AtomicTomlError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error(&self.path)(e)),
            _ => Ok(()),
        }
    }

    fn parent_dir(&self) -> Result<&Path, AtomicTomlError> {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                io_error(&self.path)(std::io::Error::new(
                    ErrorKind::InvalidInput,
                    "path has no parent directory",
                ))
            })
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Exclusive lock on `<file>.lock`, released on drop.
///
/// The lock file itself is left in place. Unlinking it would let a waiter hold
/// a lock on a file that a newcomer no longer sees.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        if let Some(dir) = lock_path.parent() {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error(&lock_path))?;

        fs2::FileExt::lock_exclusive(&file).map_err(|source| AtomicTomlError::Lock {
            path: lock_path,
            source,
        })?;

        Ok(Self { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    type Entries = BTreeMap<String, String>;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Entries>::new(temp_dir.path().join("session.toml"));

        let mut entries = Entries::new();
        entries.insert("token".into(), "abc".into());
        file.save(&entries).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.get("token").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Entries>::new(temp_dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.toml");
        let file = AtomicTomlFile::<Entries>::new(path.clone());

        file.update(Entries::new(), |entries| {
            entries.insert("user".into(), "{}".into());
            Ok(())
        })
        .unwrap();
        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join(".session.toml.tmp").exists());
        // The lock file stays behind for the next locker.
        assert!(path.with_extension("lock").exists());

        file.delete().unwrap();
        file.delete().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_update_or_delete() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let file = AtomicTomlFile::<Entries>::new(path.clone());

        let mut entries = Entries::new();
        entries.insert("token".into(), "abc".into());
        entries.insert("user".into(), "{}".into());
        file.save(&entries).unwrap();

        file.update_or_delete(Entries::new(), |entries| {
            entries.remove("token");
            Ok(!entries.is_empty())
        })
        .unwrap();
        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["user"]);

        file.update_or_delete(Entries::new(), |entries| {
            entries.remove("user");
            Ok(!entries.is_empty())
        })
        .unwrap();
        assert!(!path.exists());

        // Nothing to delete is fine too.
        file.update_or_delete(Entries::new(), |entries| Ok(!entries.is_empty()))
            .unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_lock_is_exclusive_across_handles() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");

        let held = FileLock::acquire(&path).unwrap();
        let other = OpenOptions::new()
            .write(true)
            .open(path.with_extension("lock"))
            .unwrap();
        assert!(fs2::FileExt::try_lock_exclusive(&other).is_err());

        drop(held);
        assert!(fs2::FileExt::try_lock_exclusive(&other).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let file = AtomicTomlFile::<Entries>::new(path.clone()).private();
        file.save(&Entries::new()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
