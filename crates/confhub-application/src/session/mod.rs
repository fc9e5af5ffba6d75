//! Session application services.
//!
//! The manager owns the login lifecycle; the expiry interceptor reacts to
//! rejected credentials on any call. Both work on a shared [`SessionContext`].

mod context;
mod expiry;
mod manager;

pub use context::SessionContext;
pub use expiry::SessionExpiryInterceptor;
pub use manager::{LoginResult, SessionManager, SignupOutcome};
