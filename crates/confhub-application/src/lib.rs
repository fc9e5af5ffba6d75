//! Application layer for confhub.
//!
//! This crate provides the use cases behind each console view. They
//! coordinate the domain types in `confhub-core` with the REST bindings in
//! `confhub-interaction`.

pub mod catalog;
pub mod dashboard;
pub mod session;
pub mod upload;

pub use catalog::{ConfigCatalog, ConfigView, ServiceFilter, ServiceGroup, ServiceListing};
pub use dashboard::{Dashboard, DashboardOverview};
pub use session::{LoginResult, SessionContext, SessionManager, SignupOutcome};
pub use upload::UploadFlow;
