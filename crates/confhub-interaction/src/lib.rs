//! REST bindings for the configuration backend.

pub mod auth_service;
pub mod client;
pub mod config_service;

pub use auth_service::{AuthService, LoginResponse};
pub use client::{ApiClient, CredentialSlot, ResponseInterceptor};
pub use config_service::{ConfigService, UploadRequest};
