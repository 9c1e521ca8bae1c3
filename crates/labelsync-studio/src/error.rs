//! Error types for the annotation platform client

use thiserror::Error;

/// Result type alias using `StudioError`
pub type Result<T> = std::result::Result<T, StudioError>;

/// Errors returned by the annotation platform client
#[derive(Error, Debug)]
pub enum StudioError {
    /// Non-success HTTP status from the API
    #[error("{operation} failed ({status}): {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StudioError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Authentication or authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
