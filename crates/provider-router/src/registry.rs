//! Closed registry of chat backends.
//!
//! Adding a backend means adding a variant here and wiring it into
//! `descriptor` and `instantiate`; the router itself is unchanged.

use std::sync::Arc;

use provider_core::{Provider, ProviderDescriptor, ProviderError};

/// The backend dispatched to when none has been selected.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::LmStudio;

/// Backend-specific construction options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Base URL override; each backend falls back to its own default.
    pub base_url: Option<String>,
}

impl ProviderOptions {
    /// Options with an explicit base URL.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: Some(url.into()),
        }
    }
}

/// Every chat backend this deployment can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    LmStudio,
    Ollama,
}

impl ProviderKind {
    /// All registered backends.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::LmStudio, ProviderKind::Ollama];

    /// Look up a backend by its registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lm_studio" => Some(Self::LmStudio),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Registry name of this backend.
    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Static capability descriptor for this backend.
    pub fn descriptor(&self) -> ProviderDescriptor {
        match self {
            Self::LmStudio => lmstudio_provider::DESCRIPTOR,
            Self::Ollama => ollama_provider::DESCRIPTOR,
        }
    }

    /// Build a client for this backend.
    pub fn instantiate(&self, options: &ProviderOptions) -> Result<Arc<dyn Provider>, ProviderError> {
        match self {
            Self::LmStudio => {
                let base_url = options
                    .base_url
                    .clone()
                    .unwrap_or_else(|| lmstudio_provider::DEFAULT_BASE_URL.to_string());
                Ok(Arc::new(lmstudio_provider::LmStudioProvider::new(base_url)?))
            }
            Self::Ollama => {
                let base_url = options
                    .base_url
                    .clone()
                    .unwrap_or_else(|| ollama_provider::DEFAULT_BASE_URL.to_string());
                Ok(Arc::new(ollama_provider::OllamaProvider::new(base_url)?))
            }
        }
    }
}
