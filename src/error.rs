//! Error types for patronkv
//!
//! Provides a unified error type for all operations. Not-found is never an
//! error: lookups return `Option`.

use thiserror::Error;

use crate::key::EntityKind;

/// Result type alias using PatronError
pub type Result<T> = std::result::Result<T, PatronError>;

/// Unified error type for patronkv operations
#[derive(Debug, Error)]
pub enum PatronError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Identity Errors
    // -------------------------------------------------------------------------
    #[error("No authenticated caller")]
    Unauthenticated,

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Entity kind not registered with the store: {0}")]
    UnregisteredKind(EntityKind),

    #[error("Key kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for PatronError {
    fn from(err: bincode::Error) -> Self {
        PatronError::Serialization(err.to_string())
    }
}
