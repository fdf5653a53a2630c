//! LM Studio chat backend over the OpenAI-compatible HTTP API.
//!
//! LM Studio runs locally and exposes an OpenAI-compatible endpoint,
//! by default at `http://127.0.0.1:1234/v1`.
//!
//! # Example
//!
//! ```no_run
//! use lmstudio_provider::LmStudioProvider;
//! use provider_core::{Message, Provider};
//!
//! # async fn example() -> Result<(), provider_core::ProviderError> {
//! let provider = LmStudioProvider::new("http://127.0.0.1:1234/v1")?;
//! let response = provider
//!     .chat(&[Message::user("Hello!")], "local-model")
//!     .await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod api_types;
mod provider;

pub use api_types::{ChatCompletionRequest, WireContent, WireMessage, WirePart};
pub use provider::{
    LmStudioProvider, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DESCRIPTOR,
};
