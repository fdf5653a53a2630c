//! Ollama chat backend over the native REST API.
//!
//! Ollama runs locally and exposes a REST API, by default at
//! `http://127.0.0.1:11434`. Multimodal messages are split the way Ollama
//! expects: text parts joined into `content`, images carried as base64
//! strings in `images`.
//!
//! # Example
//!
//! ```no_run
//! use ollama_provider::OllamaProvider;
//! use provider_core::{Message, Provider};
//!
//! # async fn example() -> Result<(), provider_core::ProviderError> {
//! let provider = OllamaProvider::new("http://127.0.0.1:11434")?;
//! let response = provider.chat(&[Message::user("Hello!")], "llama3").await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod api_types;
mod provider;

pub use api_types::{ChatRequest, WireMessage};
pub use provider::{
    OllamaProvider, CHAT_TIMEOUT, DEFAULT_BASE_URL, DESCRIPTOR, HEALTH_TIMEOUT, MODELS_TIMEOUT,
};
