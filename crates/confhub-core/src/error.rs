//! Error types for the confhub client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Notice shown when any call is rejected with `401`.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// A shared error type for the entire confhub client.
///
/// HTTP failures are classified by status into the variants below so that
/// callers and the central interceptor can react without re-inspecting
/// responses.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfhubError {
    /// Credentials were rejected at login.
    #[error("{0}")]
    AuthFailure(String),

    /// The backend answered `401` to an authenticated call.
    #[error("Session expired: {message}")]
    SessionExpired { message: String },

    /// The backend answered `403`.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// The backend answered `404`.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The backend answered `409`.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The backend answered with a 5xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConfhubError {
    /// Creates an error for the given HTTP status, keeping the server message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        match status {
            401 => Self::SessionExpired { message },
            403 => Self::PermissionDenied { message },
            404 => Self::NotFound { message },
            409 => Self::Conflict { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Http { status, message },
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } => Some(401),
            Self::PermissionDenied { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Server { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server body, when there was one.
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            Self::SessionExpired { message }
            | Self::PermissionDenied { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Server { message, .. }
            | Self::Http { message, .. } => message.as_str(),
            _ => return None,
        };
        (!message.is_empty()).then_some(message)
    }

    /// Check if this is a `401` rejection
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The user-facing notice for a failed backend call.
    ///
    /// Returns `None` for errors that did not come from the API.
    pub fn notice_message(&self) -> Option<String> {
        let text = match self {
            Self::SessionExpired { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::PermissionDenied { .. } => {
                "You do not have permission to perform this action.".to_string()
            }
            Self::NotFound { .. } => "Resource not found.".to_string(),
            Self::Server { .. } => "Server error. Please try again later.".to_string(),
            Self::Conflict { .. } | Self::Http { .. } => self
                .server_message()
                .unwrap_or("An error occurred.")
                .to_string(),
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            _ => return None,
        };
        Some(text)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ConfhubError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ConfhubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfhubError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            format: "YAML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfhubError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ConfhubError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ConfhubError>`.
pub type Result<T> = std::result::Result<T, ConfhubError>;
