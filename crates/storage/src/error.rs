//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document could not be encoded or decoded.
    #[error("malformed document in {collection}: {source}")]
    Malformed {
        collection: String,
        source: serde_json::Error,
    },

    /// A document key did not parse as the id type its collection requires.
    #[error("invalid key in {collection}: {key:?}")]
    InvalidKey { collection: String, key: String },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
