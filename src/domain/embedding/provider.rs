//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::EmbeddingVector;
use crate::domain::DomainError;

/// Trait for embedding services (Gemini, OpenAI-compatible, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed exactly the given text
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model this provider is configured with
    fn model(&self) -> &str;

    /// Get the embedding dimensions the provider is expected to return
    fn dimensions(&self) -> usize;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        fixed: HashMap<String, Vec<f32>>,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                fixed: HashMap::new(),
                error: None,
            }
        }

        /// Return `vector` whenever exactly `text` is embedded
        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.fixed.insert(text.into(), vector);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::upstream(self.name, error));
            }

            if let Some(vector) = self.fixed.get(text) {
                return Ok(EmbeddingVector::new(vector.clone()));
            }

            // Deterministic mock embedding based on text hash
            let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
            let values: Vec<f32> = (0..self.dimensions)
                .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                .collect();

            Ok(EmbeddingVector::new(values))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn model(&self) -> &str {
            "mock-embedding"
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_dimensions() {
            let provider = MockEmbeddingProvider::new("test", 128);

            let vector = provider.embed("Hello").await.unwrap();

            assert_eq!(vector.dimensions(), 128);
        }

        #[tokio::test]
        async fn test_mock_provider_fixed_vector() {
            let provider = MockEmbeddingProvider::new("test", 3)
                .with_vector("recursion", vec![1.0, 0.0, 0.0]);

            let vector = provider.embed("recursion").await.unwrap();

            assert_eq!(vector.values(), &[1.0, 0.0, 0.0]);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new("test", 128).with_error("API error");

            let result = provider.embed("Hello").await;

            assert!(matches!(result, Err(DomainError::Upstream { .. })));
        }

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 64);

            let first = provider.embed("Hello").await.unwrap();
            let second = provider.embed("Hello").await.unwrap();

            assert_eq!(first, second);
        }
    }
}
