//! Storage error types for smartplant-store.

use smartplant_core::errors::CoreError;
use smartplant_schema::SchemaError;
use thiserror::Error;

/// Errors from storage adapters and the plant store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A payload for a well-known key failed structural validation.
    #[error("Payload validation failed: {0}")]
    Validation(#[from] SchemaError),

    /// A domain object passed to a mutation broke an invariant.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    /// JSON encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Filesystem error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A raw key-value backend reported a failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A mutation was attempted before `hydrate()` completed.
    #[error("Store has not been hydrated")]
    NotHydrated,

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
