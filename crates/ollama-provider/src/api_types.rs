//! Ollama native REST API request and response types.

use provider_core::{ContentPart, Message, MessageContent, Usage};
use serde::{Deserialize, Serialize};

/// Chat request body for `/api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<WireMessage>,
    /// Always false; the relay does not consume streamed responses.
    pub stream: bool,
}

/// A single message in the Ollama shape.
///
/// Ollama has no typed parts: text goes into `content`, images ride
/// alongside as raw base64 strings.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    /// Role: "system", "user", or "assistant"
    pub role: &'static str,
    /// All text parts joined with a single space
    pub content: String,
    /// Base64 image payloads, omitted when empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl WireMessage {
    /// Convert a backend-agnostic message into the Ollama shape.
    pub fn from_message(msg: &Message) -> Self {
        match &msg.content {
            MessageContent::Text(text) => Self {
                role: msg.role.as_str(),
                content: text.clone(),
                images: None,
            },
            MessageContent::Parts(parts) => {
                let mut text_parts = Vec::new();
                let mut images = Vec::new();

                for part in parts {
                    match part {
                        ContentPart::Text(text) => text_parts.push(text.as_str()),
                        ContentPart::Image { base64 } => images.push(base64.clone()),
                    }
                }

                Self {
                    role: msg.role.as_str(),
                    content: text_parts.join(" "),
                    images: if images.is_empty() { None } else { Some(images) },
                }
            }
        }
    }
}

/// Chat response body from `/api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseBody {
    /// The assistant message
    #[serde(default)]
    pub message: ResponseMessage,
    /// Prompt token counter, if reported
    pub prompt_eval_count: Option<u32>,
    /// Completion token counter, if reported
    pub eval_count: Option<u32>,
}

/// The assistant message within a chat response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatResponseBody {
    /// Usage derived from Ollama's eval counters: prompt + completion,
    /// summed for the total. `None` when the backend reported neither.
    pub fn usage(&self) -> Option<Usage> {
        if self.prompt_eval_count.is_none() && self.eval_count.is_none() {
            return None;
        }

        let prompt_tokens = self.prompt_eval_count.unwrap_or(0);
        let completion_tokens = self.eval_count.unwrap_or(0);
        Some(Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        })
    }
}

/// Error body from any Ollama endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error message
    pub error: String,
}

/// Models listing response from `/api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

/// One entry of the tags listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    pub name: String,
}
