//! OpenAI-compatible API request and response types.

use provider_core::{ContentPart, Message, MessageContent};
use serde::{Deserialize, Serialize};

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<WireMessage>,
}

/// A single message in the OpenAI-compatible shape.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    /// Role: "system", "user", or "assistant"
    pub role: &'static str,
    /// Plain string or ordered typed parts
    pub content: WireContent,
}

/// Message content in the OpenAI-compatible shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

/// One typed content part.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum WirePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// Image reference carried as a data URI.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl WireMessage {
    /// Convert a backend-agnostic message into the OpenAI-compatible shape.
    ///
    /// Image parts become `image_url` entries with a base64 JPEG data URI.
    pub fn from_message(msg: &Message) -> Self {
        let content = match &msg.content {
            MessageContent::Text(text) => WireContent::Text(text.clone()),
            MessageContent::Parts(parts) => {
                WireContent::Parts(parts.iter().map(WirePart::from_part).collect())
            }
        };
        Self {
            role: msg.role.as_str(),
            content,
        }
    }
}

impl WirePart {
    fn from_part(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text(text) => WirePart::Text { text: text.clone() },
            ContentPart::Image { base64 } => WirePart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/jpeg;base64,{}", base64),
                },
            },
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response choices
    pub choices: Vec<Choice>,
    /// Token usage, if reported
    pub usage: Option<Usage>,
}

/// A response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The message
    pub message: ResponseMessage,
}

/// Response message.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Content (may be null)
    pub content: Option<String>,
}

/// Token usage information, copied through unchanged.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ApiErrorDetails,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Error message
    pub message: String,
}

/// Models listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsResponse {
    pub data: Vec<ModelEntry>,
}

/// One entry of the models listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}
