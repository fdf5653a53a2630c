//! Error types for provider operations.

use thiserror::Error;

/// Errors that can occur while talking to a chat backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested provider name is not in the registry.
    #[error("unknown provider: {0}")]
    Unknown(String),

    /// The backend could not be reached (connect, timeout, transport).
    #[error("backend unreachable: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered with a body we could not interpret.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    /// Client construction or options were invalid.
    #[error("provider configuration error: {0}")]
    Configuration(String),
}
