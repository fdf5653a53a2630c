//! Provider response types.

use serde::{Deserialize, Serialize};

/// Response from a chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated reply text.
    pub text: String,
    /// Model that produced the reply.
    pub model: String,
    /// Registry name of the provider that served the request.
    pub provider: String,
    /// Token counters, when the backend reported any.
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An available model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    /// Registry name of the provider that offers it.
    pub provider: String,
}
