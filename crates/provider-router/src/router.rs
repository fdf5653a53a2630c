//! Dispatch of chat operations to the active backend.

use std::collections::HashMap;
use std::sync::Arc;

use provider_core::{ChatResponse, Message, Model, Provider, ProviderDescriptor, ProviderError};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::registry::{ProviderKind, ProviderOptions, DEFAULT_PROVIDER};

struct CachedClient {
    options: ProviderOptions,
    client: Arc<dyn Provider>,
}

/// Routes chat operations to one of the registered backends.
///
/// Construct one router and share it by reference; there is no global
/// instance. Clients are cached per backend. Reconfiguration swaps the
/// cached entry only — a call already holding the previous `Arc` keeps
/// using it undisturbed.
pub struct ProviderRouter {
    active: RwLock<ProviderKind>,
    instances: RwLock<HashMap<ProviderKind, CachedClient>>,
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRouter {
    /// Create a router with an empty cache and the default backend active.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(DEFAULT_PROVIDER),
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// (Re)build and cache the client for `name`.
    ///
    /// Returns false when `name` is not in the registry or the client could
    /// not be constructed.
    pub async fn configure(&self, name: &str, options: ProviderOptions) -> bool {
        let Some(kind) = ProviderKind::from_name(name) else {
            error!("Unknown provider: {}", name);
            return false;
        };

        match kind.instantiate(&options) {
            Ok(client) => {
                self.instances
                    .write()
                    .await
                    .insert(kind, CachedClient { options, client });
                info!("Configured provider: {}", name);
                true
            }
            Err(e) => {
                error!("Failed to configure provider {}: {}", name, e);
                false
            }
        }
    }

    /// Reconfigure `name` only when `options` differ from the cached ones.
    pub async fn ensure_configured(&self, name: &str, options: ProviderOptions) -> bool {
        let Some(kind) = ProviderKind::from_name(name) else {
            error!("Unknown provider: {}", name);
            return false;
        };

        {
            let instances = self.instances.read().await;
            if let Some(cached) = instances.get(&kind) {
                if cached.options == options {
                    return true;
                }
            }
        }

        self.configure(name, options).await
    }

    /// Switch the active backend. Returns false for unknown names.
    pub async fn set_active(&self, name: &str) -> bool {
        let Some(kind) = ProviderKind::from_name(name) else {
            error!("Unknown provider: {}", name);
            return false;
        };

        *self.active.write().await = kind;
        true
    }

    /// Registry name of the currently active backend.
    pub async fn active(&self) -> &'static str {
        self.active.read().await.name()
    }

    /// Resolve a client by name, or the active one when omitted.
    ///
    /// A backend that was never configured is lazily instantiated with
    /// default options; only a name outside the registry fails.
    pub async fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn Provider>, ProviderError> {
        let kind = match name {
            Some(n) => {
                ProviderKind::from_name(n).ok_or_else(|| ProviderError::Unknown(n.to_string()))?
            }
            None => *self.active.read().await,
        };

        if let Some(cached) = self.instances.read().await.get(&kind) {
            return Ok(Arc::clone(&cached.client));
        }

        let mut instances = self.instances.write().await;
        // Another task may have instantiated while we waited for the lock.
        if let Some(cached) = instances.get(&kind) {
            return Ok(Arc::clone(&cached.client));
        }

        let options = ProviderOptions::default();
        let client = kind.instantiate(&options)?;
        instances.insert(
            kind,
            CachedClient {
                options,
                client: Arc::clone(&client),
            },
        );
        info!("Instantiated provider {} with defaults", kind.name());
        Ok(client)
    }

    /// Send a chat request to a backend.
    ///
    /// Backend failures propagate unchanged; there is no retry and no
    /// fallback to another backend.
    pub async fn chat(
        &self,
        messages: &[Message],
        model: &str,
        name: Option<&str>,
    ) -> Result<ChatResponse, ProviderError> {
        let provider = self.resolve(name).await?;
        provider.chat(messages, model).await
    }

    /// List models from a backend. Any failure yields an empty list.
    pub async fn list_models(&self, name: Option<&str>) -> Vec<Model> {
        let provider = match self.resolve(name).await {
            Ok(provider) => provider,
            Err(e) => {
                warn!("Cannot list models: {}", e);
                return Vec::new();
            }
        };

        match provider.list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!("Error listing {} models: {}", provider.name(), e);
                Vec::new()
            }
        }
    }

    /// Check whether a backend is reachable. Any failure yields false.
    pub async fn health_check(&self, name: Option<&str>) -> bool {
        match self.resolve(name).await {
            Ok(provider) => provider.health_check().await,
            Err(e) => {
                warn!("Cannot health-check: {}", e);
                false
            }
        }
    }

    /// Capability descriptors for every registered backend.
    pub fn list_providers(&self) -> Vec<ProviderDescriptor> {
        ProviderKind::ALL.iter().map(|k| k.descriptor()).collect()
    }

    /// Registry names of backends with a cached client.
    pub async fn list_configured(&self) -> Vec<&'static str> {
        self.instances.read().await.keys().map(|k| k.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_active_provider() {
        let router = ProviderRouter::new();
        assert_eq!(router.active().await, "lm_studio");
    }

    #[tokio::test]
    async fn test_set_active_known_and_unknown() {
        let router = ProviderRouter::new();

        assert!(router.set_active("ollama").await);
        assert_eq!(router.active().await, "ollama");

        assert!(!router.set_active("anthropic").await);
        assert_eq!(router.active().await, "ollama");
    }

    #[tokio::test]
    async fn test_configure_unknown_provider_is_false() {
        let router = ProviderRouter::new();
        assert!(!router.configure("anthropic", ProviderOptions::default()).await);
    }

    #[tokio::test]
    async fn test_resolve_lazily_instantiates_with_defaults() {
        let router = ProviderRouter::new();

        // No configure call was made for ollama.
        let provider = router.resolve(Some("ollama")).await.unwrap();
        assert_eq!(provider.name(), "ollama");
        assert!(router.list_configured().await.contains(&"ollama"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_name_fails() {
        let router = ProviderRouter::new();
        let result = router.resolve(Some("anthropic")).await;
        assert!(matches!(result, Err(ProviderError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_resolve_without_name_uses_active() {
        let router = ProviderRouter::new();
        router.set_active("ollama").await;

        let provider = router.resolve(None).await.unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[tokio::test]
    async fn test_configure_replaces_cached_client() {
        let router = ProviderRouter::new();

        let before = router.resolve(Some("ollama")).await.unwrap();
        assert!(
            router
                .configure("ollama", ProviderOptions::with_base_url("http://127.0.0.1:9"))
                .await
        );
        let after = router.resolve(Some("ollama")).await.unwrap();

        // The old handle stays valid for in-flight calls; new resolves see
        // the replacement.
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_ensure_configured_skips_matching_options() {
        let router = ProviderRouter::new();
        let options = ProviderOptions::with_base_url("http://127.0.0.1:9");

        assert!(router.configure("ollama", options.clone()).await);
        let before = router.resolve(Some("ollama")).await.unwrap();

        assert!(router.ensure_configured("ollama", options).await);
        let after = router.resolve(Some("ollama")).await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));

        assert!(
            router
                .ensure_configured("ollama", ProviderOptions::with_base_url("http://127.0.0.1:10"))
                .await
        );
        let reconfigured = router.resolve(Some("ollama")).await.unwrap();
        assert!(!Arc::ptr_eq(&after, &reconfigured));
    }

    #[tokio::test]
    async fn test_chat_unknown_provider_fails_fast() {
        let router = ProviderRouter::new();
        let result = router
            .chat(&[Message::user("hi")], "local-model", Some("anthropic"))
            .await;
        assert!(matches!(result, Err(ProviderError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_chat_propagates_backend_failure() {
        let router = ProviderRouter::new();
        router
            .configure("ollama", ProviderOptions::with_base_url("http://127.0.0.1:9"))
            .await;

        let result = router
            .chat(&[Message::user("hi")], "llama3", Some("ollama"))
            .await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn test_list_models_unreachable_is_empty() {
        let router = ProviderRouter::new();
        router
            .configure("ollama", ProviderOptions::with_base_url("http://127.0.0.1:9"))
            .await;

        assert!(router.list_models(Some("ollama")).await.is_empty());
        // Unknown names degrade the same way.
        assert!(router.list_models(Some("anthropic")).await.is_empty());
    }

    #[tokio::test]
    async fn test_health_check_unreachable_is_false() {
        let router = ProviderRouter::new();
        router
            .configure("ollama", ProviderOptions::with_base_url("http://127.0.0.1:9"))
            .await;

        assert!(!router.health_check(Some("ollama")).await);
        assert!(!router.health_check(Some("anthropic")).await);
    }

    #[tokio::test]
    async fn test_list_providers_covers_registry() {
        let router = ProviderRouter::new();
        let names: Vec<_> = router.list_providers().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["lm_studio", "ollama"]);
    }
}
