//! Session domain model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RecordId;

/// Profile of the signed-in operator, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

impl UserProfile {
    /// Name shown in headers; falls back to the email when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// An authenticated session: the bearer token plus the profile it belongs to.
///
/// Both parts are required, so a half-initialized session cannot be built.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Value of the `Authorization` header for this session.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Serializes the user entry for durable storage.
    pub fn user_entry(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.user)
    }

    /// Rebuilds a session from the two persisted entries.
    ///
    /// Returns `None` unless both entries exist, the token is non-blank and the
    /// user entry decodes.
    pub fn from_entries(token: Option<String>, user: Option<String>) -> Option<Self> {
        let token = token.filter(|t| !t.trim().is_empty())?;
        let user: UserProfile = serde_json::from_str(&user?).ok()?;
        Some(Self::new(token, user))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Authentication state of the running client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Persisted credentials have not been read yet.
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session().map(Session::user)
    }

    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated(_) => "authenticated",
        }
    }
}
