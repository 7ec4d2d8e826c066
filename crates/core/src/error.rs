//! Unified error types for the todos workspace.
//!
//! Remote failures are deliberately collapsed into a single variant: callers
//! of a collection never branch on transport vs. constraint vs. validation.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for todos.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input rejected before any remote call (e.g., empty title).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Any failure reported by the remote collection.
    #[error("REMOTE_FAILURE: {0}")]
    Remote(String),

    /// No cached page for the requested query identity.
    #[error("NOT_CACHED: {0}")]
    NotCached(String),

    /// Preference database operation failed.
    #[error("PREFS_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("PREFS_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored preference could not be encoded or decoded.
    #[error("PREFS_ERROR: invalid preference {key}: {reason}")]
    InvalidPreference { key: String, reason: String },
}

impl Error {
    /// Build the opaque remote failure from anything displayable.
    pub fn remote(err: impl std::fmt::Display) -> Self {
        Error::Remote(err.to_string())
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Remote(msg) => (-32000, msg.clone()),
            Error::NotCached(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidPreference { .. } => (-32002, err.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
