//! Error types for upsync-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for upsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for upsync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Credential file does not exist
    #[error("Credential file not found: {0}")]
    CredentialsMissing(String),

    /// Credential file exists but cannot be parsed
    #[error("Credential file invalid: {0}")]
    CredentialsInvalid(String),

    /// Upload root is not a directory
    #[error("Not a directory: {0}")]
    InvalidDirectory(String),

    /// Local file could not be read for upload
    #[error("Cannot read {path}: {source}")]
    LocalFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Storage call rejected for missing or bad authorization
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Remote resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (transport, timeout, unreachable endpoint)
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::CredentialsMissing(_) => 2,  // UsageError
            Error::CredentialsInvalid(_) => 2,  // UsageError
            Error::InvalidDirectory(_) => 2,    // UsageError
            Error::InvalidUrl(_) => 2,          // UsageError
            Error::Network(_) => 3,             // NetworkError
            Error::PermissionDenied(_) => 4,    // AuthError
            Error::NotFound(_) => 5,            // NotFound
            _ => 1,                             // GeneralError
        }
    }
}
