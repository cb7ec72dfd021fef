//! Error types shared by the API client, the stores and the controllers
use thiserror::Error;

/// Errors surfaced while talking to the backend or the local store
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, timeout, TLS failure and the like
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not the JSON we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The backend answered with an `{"error": ...}` body
    #[error("{0}")]
    Backend(String),

    /// Reading or writing the client-local store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Submission attempted while the form is not submittable
    #[error("Reservation form is not valid: {0}")]
    InvalidForm(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
