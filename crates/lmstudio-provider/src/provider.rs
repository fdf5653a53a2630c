//! LmStudioProvider implementation over the OpenAI-compatible API.

use std::time::Duration;

use provider_core::{
    async_trait, ChatResponse, Message, Model, Provider, ProviderDescriptor, ProviderError, Usage,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ModelsResponse, WireMessage,
};

/// Default OpenAI-compatible endpoint exposed by LM Studio.
/// 127.0.0.1 instead of localhost to avoid IPv6 resolution issues.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1234/v1";

/// Placeholder API key; LM Studio accepts any value.
pub const DEFAULT_API_KEY: &str = "lm-studio";

/// Request timeout, matching the upstream OpenAI client default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Capability record for this backend.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "lm_studio",
    display_name: "LM Studio",
    supports_vision: true,
    supports_streaming: true,
};

/// A provider that talks to a local LM Studio instance.
pub struct LmStudioProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LmStudioProvider {
    /// Create a provider with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a provider with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::Configuration(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        })
    }

    /// Override the API key sent as a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_error(status: u16, body: String) -> ProviderError {
        // Prefer the structured error message when the body carries one.
        let message = match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => api_error.error.message,
            Err(_) => body,
        };
        ProviderError::Api { status, message }
    }

    async fn fetch_models(&self) -> Result<ModelsResponse, ProviderError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to reach LM Studio: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status.as_u16(), body));
        }

        response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse models listing: {}", e))
        })
    }
}

#[async_trait]
impl Provider for LmStudioProvider {
    async fn chat(&self, messages: &[Message], model: &str) -> Result<ChatResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.iter().map(WireMessage::from_message).collect(),
        };

        info!(
            "Sending request to LM Studio ({}) with model {}",
            self.base_url, model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to reach LM Studio: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status.as_u16(), body));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse chat response: {}", e))
        })?;

        debug!("Received response from LM Studio");

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        // Usage counters are copied through unchanged when present.
        let usage = completion.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            text,
            model: model.to_string(),
            provider: DESCRIPTOR.name.to_string(),
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<Model>, ProviderError> {
        let models = self.fetch_models().await?;

        Ok(models
            .data
            .into_iter()
            .map(|m| Model {
                name: m.id.clone(),
                id: m.id,
                provider: DESCRIPTOR.name.to_string(),
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        match self.fetch_models().await {
            Ok(_) => true,
            Err(e) => {
                warn!("LM Studio health check failed: {}", e);
                false
            }
        }
    }

    fn descriptor(&self) -> ProviderDescriptor {
        DESCRIPTOR
    }
}
