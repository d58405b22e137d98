//! Embedding provider implementations

mod gemini;
mod openai;

pub use gemini::GeminiEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

pub(crate) use gemini::DEFAULT_GEMINI_BASE_URL;

// Re-export HTTP client for use by embedding providers
pub use super::http_client::{HttpClient, HttpClientTrait};

use std::sync::Arc;

use crate::config::{api_key_from_env, EmbeddingConfig, ProviderKind};
use crate::domain::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::domain::DomainError;

/// Reject empty vectors and vectors of the wrong size
fn validate_vector(
    service: &str,
    values: Vec<f32>,
    expected_dimensions: usize,
) -> Result<EmbeddingVector, DomainError> {
    if values.is_empty() {
        return Err(DomainError::upstream(service, "Embedding service returned an empty vector"));
    }

    if values.len() != expected_dimensions {
        return Err(DomainError::upstream(
            service,
            format!(
                "Embedding has {} dimensions, expected {}",
                values.len(),
                expected_dimensions
            ),
        ));
    }

    Ok(EmbeddingVector::new(values))
}

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create the configured provider, reading its API key from the environment
    pub fn create(
        config: &EmbeddingConfig,
        client: HttpClient,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let api_key = api_key_from_env(&config.api_key_env)?;
        Ok(Self::create_with_key(config, client, api_key))
    }

    pub fn create_with_key(
        config: &EmbeddingConfig,
        client: HttpClient,
        api_key: impl Into<String>,
    ) -> Arc<dyn EmbeddingProvider> {
        match config.provider {
            ProviderKind::Gemini => {
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_GEMINI_BASE_URL);
                Arc::new(
                    GeminiEmbeddingProvider::with_base_url(client, api_key, base_url)
                        .with_model(&config.model, config.dimensions),
                )
            }
            ProviderKind::OpenAi => {
                let provider = match &config.base_url {
                    Some(base_url) => OpenAiEmbeddingProvider::with_base_url(client, api_key, base_url),
                    None => OpenAiEmbeddingProvider::new(client, api_key),
                };
                Arc::new(provider.with_model(&config.model, Some(config.dimensions)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vector() {
        assert!(validate_vector("test", vec![], 3).is_err());
        assert!(validate_vector("test", vec![0.1, 0.2], 3).is_err());
        assert_eq!(
            validate_vector("test", vec![0.1, 0.2, 0.3], 3)
                .unwrap()
                .dimensions(),
            3
        );
    }

    #[test]
    fn test_factory_selects_provider() {
        let mut config = EmbeddingConfig::default();
        let gemini = EmbeddingProviderFactory::create_with_key(&config, HttpClient::new(), "key");

        assert_eq!(gemini.provider_name(), "gemini");
        assert_eq!(gemini.model(), "text-embedding-004");
        assert_eq!(gemini.dimensions(), 768);

        config.provider = ProviderKind::OpenAi;
        config.model = "text-embedding-3-small".to_string();
        config.dimensions = 1536;
        let openai = EmbeddingProviderFactory::create_with_key(&config, HttpClient::new(), "key");

        assert_eq!(openai.provider_name(), "openai");
        assert_eq!(openai.dimensions(), 1536);
    }

    #[test]
    fn test_factory_requires_api_key() {
        let config = EmbeddingConfig {
            api_key_env: "COGNITIVE_CORE_UNSET_EMBEDDING_KEY".to_string(),
            ..EmbeddingConfig::default()
        };

        let result = EmbeddingProviderFactory::create(&config, HttpClient::new());

        assert!(result.is_err());
    }
}
