//! Domain layer of the confhub client.
//!
//! Holds the types shared by every other crate: parsed config values, backend
//! records, the session model, the error taxonomy, and the traits through
//! which the application reaches storage, notifications and navigation.

pub mod config;
pub mod error;
pub mod format;
pub mod navigation;
pub mod notice;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{ConfhubError, Result};
