use std::sync::Arc;

use super::{GeminiGenerationProvider, HttpClient, OpenAiGenerationProvider};
use crate::config::{api_key_from_env, GenerationConfig, ProviderKind};
use crate::domain::{DomainError, GenerationProvider};

/// Factory for creating generation providers
#[derive(Debug)]
pub struct GenerationProviderFactory;

impl GenerationProviderFactory {
    /// Create the configured provider, reading its API key from the environment
    pub fn create(
        config: &GenerationConfig,
        client: HttpClient,
    ) -> Result<Arc<dyn GenerationProvider>, DomainError> {
        let api_key = api_key_from_env(&config.api_key_env)?;
        Ok(Self::create_with_key(config, client, api_key))
    }

    pub fn create_with_key(
        config: &GenerationConfig,
        client: HttpClient,
        api_key: impl Into<String>,
    ) -> Arc<dyn GenerationProvider> {
        match (config.provider, &config.base_url) {
            (ProviderKind::Gemini, Some(base_url)) => Arc::new(
                GeminiGenerationProvider::with_base_url(client, api_key, base_url)
                    .with_model(&config.model),
            ),
            (ProviderKind::Gemini, None) => {
                Arc::new(GeminiGenerationProvider::new(client, api_key).with_model(&config.model))
            }
            (ProviderKind::OpenAi, Some(base_url)) => Arc::new(
                OpenAiGenerationProvider::with_base_url(client, api_key, base_url)
                    .with_model(&config.model),
            ),
            (ProviderKind::OpenAi, None) => {
                Arc::new(OpenAiGenerationProvider::new(client, api_key).with_model(&config.model))
            }
        }
    }
}
