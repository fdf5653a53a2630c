//! Core trait and types for chat backend implementations.
//!
//! This crate provides the shared interface for every inference backend the
//! relay can dispatch to. It defines:
//!
//! - [`Provider`] - The trait that all backend implementations must implement
//! - [`Message`] / [`ChatResponse`] - Backend-agnostic chat types
//! - [`ProviderDescriptor`] - Static capability record per implementation
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Example
//!
//! ```rust
//! use provider_core::{
//!     async_trait, ChatResponse, Message, Model, Provider, ProviderDescriptor, ProviderError,
//! };
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl Provider for MyBackend {
//!     async fn chat(
//!         &self,
//!         _messages: &[Message],
//!         model: &str,
//!     ) -> Result<ChatResponse, ProviderError> {
//!         Ok(ChatResponse {
//!             text: "Hello!".to_string(),
//!             model: model.to_string(),
//!             provider: "my_backend".to_string(),
//!             usage: None,
//!         })
//!     }
//!
//!     async fn list_models(&self) -> Result<Vec<Model>, ProviderError> {
//!         Ok(Vec::new())
//!     }
//!
//!     async fn health_check(&self) -> bool {
//!         true
//!     }
//!
//!     fn descriptor(&self) -> ProviderDescriptor {
//!         ProviderDescriptor {
//!             name: "my_backend",
//!             display_name: "My Backend",
//!             supports_vision: false,
//!             supports_streaming: false,
//!         }
//!     }
//! }
//! ```

mod error;
mod message;
mod response;
mod trait_def;

pub use error::ProviderError;
pub use message::{ContentPart, Message, MessageContent, Role};
pub use response::{ChatResponse, Model, Usage};
pub use trait_def::{Provider, ProviderDescriptor};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
