//! OllamaProvider implementation over the native REST API.

use std::time::Duration;

use provider_core::{
    async_trait, ChatResponse, Message, Model, Provider, ProviderDescriptor, ProviderError,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatRequest, ChatResponseBody, TagsResponse, WireMessage};

/// Default Ollama endpoint.
/// 127.0.0.1 instead of localhost to avoid IPv6 resolution issues.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Timeout for chat completions; local generation can be slow.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for model discovery.
pub const MODELS_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for health checks.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Capability record for this backend.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "ollama",
    display_name: "Ollama",
    supports_vision: true,
    supports_streaming: true,
};

/// A provider that talks to a local Ollama instance.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    chat_timeout: Duration,
    models_timeout: Duration,
    health_timeout: Duration,
}

impl OllamaProvider {
    /// Create a provider with the default per-operation timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        // Timeouts are applied per request, not on the client.
        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_timeout: CHAT_TIMEOUT,
            models_timeout: MODELS_TIMEOUT,
            health_timeout: HEALTH_TIMEOUT,
        })
    }

    /// Override the per-operation timeouts.
    pub fn with_timeouts(mut self, chat: Duration, models: Duration, health: Duration) -> Self {
        self.chat_timeout = chat;
        self.models_timeout = models;
        self.health_timeout = health;
        self
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_error(status: u16, body: String) -> ProviderError {
        // Prefer the structured error message when the body carries one.
        let message = match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => api_error.error,
            Err(_) => body,
        };
        ProviderError::Api { status, message }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn chat(&self, messages: &[Message], model: &str) -> Result<ChatResponse, ProviderError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.iter().map(WireMessage::from_message).collect(),
            stream: false,
        };

        info!(
            "Sending request to Ollama ({}) with model {}",
            self.base_url, model
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(self.chat_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to reach Ollama: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status.as_u16(), body));
        }

        let body: ChatResponseBody = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse chat response: {}", e))
        })?;

        debug!("Received response from Ollama");

        Ok(ChatResponse {
            text: body.message.content.clone(),
            model: model.to_string(),
            provider: DESCRIPTOR.name.to_string(),
            usage: body.usage(),
        })
    }

    async fn list_models(&self) -> Result<Vec<Model>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.models_timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to reach Ollama: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status.as_u16(), body));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse tags listing: {}", e))
        })?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| Model {
                id: m.name.clone(),
                name: m.name,
                provider: DESCRIPTOR.name.to_string(),
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Ollama health check failed: {}", e);
                false
            }
        }
    }

    fn descriptor(&self) -> ProviderDescriptor {
        DESCRIPTOR
    }
}
