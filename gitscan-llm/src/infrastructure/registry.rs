//! Provider registry
//!
//! Config-keyed factory for fix providers. A caller-supplied API key takes
//! precedence over the server-configured one, so users can bring their own
//! credentials per request.

use std::sync::Arc;
use std::time::Duration;

use gitscan_core::config::LlmConfig;
use serde::Serialize;
use tracing::info;

use crate::domain::error::LlmError;
use crate::domain::provider::{FixProvider, ProviderKind};
use crate::infrastructure::providers::{AnthropicProvider, GoogleAiProvider, OpenAiProvider};

/// One configured provider with its model menu.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderListing {
    pub provider: String,
    pub models: Vec<String>,
}

/// Model menus per backend.
fn models_for(kind: ProviderKind) -> Vec<String> {
    let models: &[&str] = match kind {
        ProviderKind::OpenAi => &["gpt-4-turbo-preview", "gpt-4", "gpt-3.5-turbo"],
        ProviderKind::Anthropic => &[
            "claude-3-opus-20240229",
            "claude-3-sonnet-20240229",
            "claude-3-haiku-20240307",
        ],
        ProviderKind::Google => &["gemini-pro", "gemini-pro-vision"],
    };
    models.iter().map(|m| m.to_string()).collect()
}

/// Creates provider instances from configuration.
pub struct ProviderRegistry {
    config: LlmConfig,
}

impl ProviderRegistry {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    /// Instantiate a provider, preferring the caller-supplied API key.
    pub fn create(
        &self,
        kind: ProviderKind,
        api_key_override: Option<&str>,
    ) -> Result<Arc<dyn FixProvider>, LlmError> {
        let configured_key = match kind {
            ProviderKind::OpenAi => self.config.openai_api_key.as_deref(),
            ProviderKind::Anthropic => self.config.anthropic_api_key.as_deref(),
            ProviderKind::Google => self.config.google_ai_api_key.as_deref(),
        };

        let api_key = api_key_override
            .or(configured_key)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(kind.as_str().to_string()))?
            .to_string();

        let timeout = Duration::from_secs(self.config.request_timeout_seconds);
        info!(provider = kind.as_str(), "Creating LLM provider");

        let provider: Arc<dyn FixProvider> = match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key, timeout)),
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(api_key, timeout)),
            ProviderKind::Google => Arc::new(GoogleAiProvider::new(api_key, timeout)),
        };

        Ok(provider)
    }

    /// Providers with a configured API key, with their model menus.
    pub fn available_providers(&self) -> Vec<ProviderListing> {
        let mut listings = Vec::new();

        let configured = [
            (ProviderKind::OpenAi, &self.config.openai_api_key),
            (ProviderKind::Anthropic, &self.config.anthropic_api_key),
            (ProviderKind::Google, &self.config.google_ai_api_key),
        ];

        for (kind, key) in configured {
            if key.as_deref().is_some_and(|k| !k.is_empty()) {
                listings.push(ProviderListing {
                    provider: kind.as_str().to_string(),
                    models: models_for(kind),
                });
            }
        }

        listings
    }

    pub fn max_tokens(&self) -> u32 {
        self.config.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            openai_api_key: Some("sk-test".to_string()),
            anthropic_api_key: None,
            google_ai_api_key: Some(String::new()),
            ..Default::default()
        }
    }

    #[test]
    fn lists_only_providers_with_nonempty_keys() {
        let registry = ProviderRegistry::new(config());
        let listings = registry.available_providers();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].provider, "OPENAI");
        assert!(!listings[0].models.is_empty());
    }

    #[test]
    fn create_fails_without_a_key() {
        let registry = ProviderRegistry::new(config());
        assert!(matches!(
            registry.create(ProviderKind::Anthropic, None),
            Err(LlmError::MissingApiKey(_))
        ));
    }

    #[test]
    fn caller_key_overrides_missing_configuration() {
        let registry = ProviderRegistry::new(config());
        let provider = registry
            .create(ProviderKind::Anthropic, Some("user-key"))
            .unwrap();
        assert_eq!(provider.provider_name(), "ANTHROPIC");
    }
}
