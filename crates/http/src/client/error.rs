//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Input rejected locally before any request was sent
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Error body returned by the portal API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from a status and raw response body.
    ///
    /// The API reports failures as `{"error": "..."}`; other bodies are kept
    /// verbatim and an empty body falls back to the status text.
    pub fn from_response_body(status: reqwest::StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body.to_string(),
        };
        Self::from_status(status, message)
    }

    /// Create a validation error from a single message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// HTTP status carried by this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed(_) => Some(401),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|status| status.as_u16()),
            Self::Serialization(_) | Self::Configuration(_) | Self::Validation(_) => None,
        }
    }

    /// Whether the server rejected the stored credentials
    pub fn is_auth_expired(&self) -> bool {
        self.status() == Some(401)
    }
}
