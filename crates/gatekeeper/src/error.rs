//! Error types for authorization decisions.

use thiserror::Error;

/// Errors that can occur while deciding an authorization.
#[derive(Debug, Error)]
pub enum GatekeeperError {
    /// The principal store failed; no decision was made.
    #[error("storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
