//! Storage layer for atomic file operations.

mod atomic_toml;
mod credential_file;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use credential_file::FileCredentialStore;
