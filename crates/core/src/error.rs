//! Error types for sd-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for sd-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sd-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (credential resolution, client construction)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid bucket, key, or prefix
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Local IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication or permission failure
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Object or bucket not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable by the caller, never by us)
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
            Error::Config(_) | Error::InvalidPath(_) => 2, // UsageError
            Error::Network(_) => 3,                        // NetworkError
            Error::Auth(_) => 4,                           // AuthError
            Error::NotFound(_) => 5,                       // NotFound
            _ => 1,                                        // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
        assert_eq!(Error::Io(std::io::Error::other("test")).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("bucket/key.txt".into());
        assert_eq!(err.to_string(), "Not found: bucket/key.txt");

        let err = Error::InvalidPath("bucket name cannot be empty".into());
        assert_eq!(err.to_string(), "Invalid path: bucket name cannot be empty");

        let err = Error::Auth("access denied".into());
        assert_eq!(err.to_string(), "Authentication failed: access denied");
    }
}
