//! User domain module.
//!
//! Account creation input and its client-side validation.

mod signup;

pub use signup::{FieldErrors, NewAccount, SignupField, SignupForm};
