//! Error types for the API client.

use thiserror::Error;

/// Placeholder detail used when a failing response carries no readable `error` field.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors that can occur while talking to the cube API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("{detail}")]
    Remote {
        /// HTTP status code of the response.
        status: u16,
        /// Detail taken from the response's `error` field.
        detail: String,
    },

    /// The request could not be completed (connection, DNS, timeout).
    #[error("request did not complete: {0}")]
    Transport(String),

    /// A successful response did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The credential cannot be used as a bearer token header.
    #[error("credential is not a valid bearer token")]
    InvalidCredential,

    /// The API base URL is unusable.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Returns whether the API itself rejected the request.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns whether the request failed before a response was received.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
