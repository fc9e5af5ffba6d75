//! Signup form validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;

/// Input fields of the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignupField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl fmt::Display for SignupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        };
        f.write_str(name)
    }
}

/// Inline errors keyed by field; empty when the form is valid.
pub type FieldErrors = BTreeMap<SignupField, String>;

/// Raw values typed into the signup form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body sent to the account creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Checks every field and returns the inline error for each invalid one.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(SignupField::Name, "Name is required".into());
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.insert(
                SignupField::Name,
                "Name must be at least 2 characters".into(),
            );
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert(SignupField::Email, "Email is required".into());
        } else if !EMAIL_RE.is_match(email) {
            errors.insert(
                SignupField::Email,
                "Please enter a valid email address".into(),
            );
        }

        if self.password.is_empty() {
            errors.insert(SignupField::Password, "Password is required".into());
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                SignupField::Password,
                "Password must be at least 6 characters".into(),
            );
        } else if !has_required_character_classes(&self.password) {
            errors.insert(
                SignupField::Password,
                "Password must contain uppercase, lowercase, and number".into(),
            );
        }

        if self.confirm_password.is_empty() {
            errors.insert(
                SignupField::ConfirmPassword,
                "Please confirm your password".into(),
            );
        } else if self.password != self.confirm_password {
            errors.insert(
                SignupField::ConfirmPassword,
                "Passwords do not match".into(),
            );
        }

        errors
    }

    /// Normalized request body: trimmed name, trimmed lower-case email.
    pub fn to_account(&self) -> NewAccount {
        NewAccount {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        }
    }
}

fn has_required_character_classes(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
