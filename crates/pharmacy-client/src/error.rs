//! Errors returned by the REST client.

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 401 from the backend (expired or invalid token).
    #[error("{0}")]
    Unauthorized(String),

    /// The call needs a signed-in user and no token was set.
    #[error("Please sign in first")]
    MissingToken,

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Base URL or path could not be joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A local file for upload could not be read.
    #[error("Could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// The one-line message to show the user.
    ///
    /// The backend's `message` field wins when present; otherwise the
    /// transport error text is used.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status { message, .. } | ClientError::Unauthorized(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// HTTP status, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Builds the error for a non-success response body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {status}"));

        if status == 401 {
            ClientError::Unauthorized(message)
        } else {
            ClientError::Status { status, message }
        }
    }
}

/// Result type for client calls.
pub type ClientResult<T> = Result<T, ClientError>;
