//! Error types for compdir
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DirError
pub type Result<T> = std::result::Result<T, DirError>;

/// Unified error type for compdir operations
#[derive(Debug, Error)]
pub enum DirError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Missing tax id or name")]
    MissingKey,

    #[error("Record not found")]
    NotFound,

    #[error("Name already used by another record: {0}")]
    DuplicateName(String),

    #[error("Data file corrupted: {0}")]
    Corrupt(String),

    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Server error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DirError {
    /// Whether the caller caused this error (bad input or unknown key).
    ///
    /// Client errors are never worth retrying unchanged.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DirError::Validation(_)
                | DirError::MissingKey
                | DirError::NotFound
                | DirError::DuplicateName(_)
                | DirError::Protocol(_)
                | DirError::Rejected(_)
        )
    }
}

impl From<bincode::Error> for DirError {
    fn from(e: bincode::Error) -> Self {
        DirError::Serialization(e.to_string())
    }
}
