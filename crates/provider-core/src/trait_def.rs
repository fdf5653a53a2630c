//! The Provider trait definition.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ProviderError;
use crate::message::Message;
use crate::response::{ChatResponse, Model};

/// Static capability record for a provider implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    /// Registry name used in config and routing (e.g. "lm_studio").
    pub name: &'static str,
    /// Human-readable name for UIs.
    pub display_name: &'static str,
    /// Whether the backend accepts image parts.
    pub supports_vision: bool,
    /// Whether the backend could stream responses. Advertised only; the
    /// relay chat path does not exercise streaming.
    pub supports_streaming: bool,
}

/// A trait for chat backends.
///
/// This trait is object-safe and can be used with `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// Transport and backend failures surface as errors; callers decide
    /// whether to retry (the router never does).
    async fn chat(&self, messages: &[Message], model: &str) -> Result<ChatResponse, ProviderError>;

    /// List the models this backend offers.
    async fn list_models(&self) -> Result<Vec<Model>, ProviderError>;

    /// Check whether the backend is reachable and answering.
    async fn health_check(&self) -> bool;

    /// Capability descriptor for this implementation.
    fn descriptor(&self) -> ProviderDescriptor;

    /// Registry name, from the descriptor.
    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Whether the backend accepts image parts.
    fn supports_vision(&self) -> bool {
        self.descriptor().supports_vision
    }

    /// Whether the backend could stream responses.
    fn supports_streaming(&self) -> bool {
        self.descriptor().supports_streaming
    }
}
