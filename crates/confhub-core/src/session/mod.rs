//! Session domain module.
//!
//! - `model`: session, user profile and authentication state
//! - `store`: durable credential storage trait

mod model;
mod store;

pub use model::{AuthState, Session, UserProfile};
pub use store::{CredentialStore, MemoryCredentialStore, TOKEN_KEY, USER_KEY};
