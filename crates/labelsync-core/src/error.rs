//! Error types for the labelsync-core crate

use labelsync_storage::StorageError;
use labelsync_studio::StudioError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ProvisionError`
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Errors that abort provisioning
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// A required configuration value is absent or empty
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Storage direction is neither `import` nor `export`
    #[error("unknown storage type: {0}, expected 'import' or 'export'")]
    InvalidStorageType(String),

    /// A file referenced by configuration could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any failure reported by a remote system
    #[error("remote API error: {0}")]
    Remote(#[from] RemoteError),

    /// A configuration document is malformed or has the wrong shape
    #[error("config parse error: {0}")]
    ConfigParse(String),
}

/// Failure from one of the remote systems
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Annotation platform API error
    #[error("annotation platform: {0}")]
    Studio(#[from] StudioError),

    /// Object storage API error
    #[error("object storage: {0}")]
    Storage(#[from] StorageError),

    /// Request refused by a non-HTTP backend (used by in-memory remotes)
    #[error("{service}: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },
}

impl ProvisionError {
    /// Shorthand for an I/O failure on `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from a remote API
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl From<StudioError> for ProvisionError {
    fn from(err: StudioError) -> Self {
        Self::Remote(RemoteError::Studio(err))
    }
}

impl From<StorageError> for ProvisionError {
    fn from(err: StorageError) -> Self {
        Self::Remote(RemoteError::Storage(err))
    }
}

impl From<config::ConfigError> for ProvisionError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
