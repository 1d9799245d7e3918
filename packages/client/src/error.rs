//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport-level failure (server unreachable, connection reset, ...)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server rejected the request parameters (400)
    #[error("Request rejected: {0}")]
    BadRequest(String),

    /// The server does not know this client id (404)
    #[error("Client ID '{0}' is not joined")]
    NotJoined(String),

    /// The server is shutting down (503)
    #[error("Server unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected response ({status}): {message}")]
    UnexpectedStatus { status: u16, message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ConnectionError(e.to_string())
    }
}
