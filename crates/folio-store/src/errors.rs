//! Error helpers for folio-store
//!
//! Wraps folio-core `FolioError` with store-specific constructors

use folio_core::errors::FolioError;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Backing store unreachable or refusing requests
pub fn unavailable(backend: &str, message: impl Into<String>) -> FolioError {
    FolioError::StoreUnavailable {
        backend: backend.to_string(),
        message: message.into(),
    }
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> FolioError {
    FolioError::Persistence {
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> FolioError {
    unavailable("sqlite", err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> FolioError {
    FolioError::Io {
        op: operation.to_string(),
        message: err.to_string(),
    }
}

/// Create an error for a failed blocking task
pub fn join_error(err: tokio::task::JoinError) -> FolioError {
    FolioError::Internal {
        message: format!("blocking store task failed: {}", err),
    }
}

/// Create an error from a reqwest failure against the remote store
pub fn from_reqwest(err: reqwest::Error) -> FolioError {
    unavailable("remote", err.to_string())
}
