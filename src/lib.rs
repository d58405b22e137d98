//! Cognitive Core
//!
//! Intent classification and retrieval-augmented answering for student queries:
//! - Trained sequence classifier with a keyword-rule fallback
//! - Embedding, vector retrieval and grounded generation behind provider traits
//! - HTTP surface and CLI around the answering pipeline

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{DomainError, KnowledgeStore};
use infrastructure::embedding::EmbeddingProviderFactory;
use infrastructure::generation::GenerationProviderFactory;
use infrastructure::http_client::HttpClient;
use infrastructure::intent::ModelLoader;
use infrastructure::knowledge::KnowledgeStoreFactory;
use infrastructure::services::{
    IntentClassifier, RagOrchestrator, ResponseGenerator, StoreHealthChecker, VectorRetriever,
};

/// Classifier backed by the process-wide model loader
pub fn create_intent_classifier(config: &AppConfig) -> IntentClassifier {
    IntentClassifier::new(ModelLoader::shared(&config.classifier))
}

/// Open the configured knowledge store
pub async fn create_knowledge_store(
    config: &AppConfig,
) -> Result<Arc<dyn KnowledgeStore>, DomainError> {
    KnowledgeStoreFactory::create(&config.knowledge_store).await
}

/// Health checker over an already opened store
pub fn create_store_health_checker(
    config: &AppConfig,
    store: Arc<dyn KnowledgeStore>,
) -> StoreHealthChecker {
    StoreHealthChecker::new(
        store,
        config.knowledge_store.metric,
        config.embedding.dimensions,
    )
}

/// Wire the full answering pipeline. Fails when a provider API key is missing
/// or the knowledge store cannot be opened.
pub async fn create_orchestrator(
    config: &AppConfig,
    store: Arc<dyn KnowledgeStore>,
) -> Result<RagOrchestrator, DomainError> {
    let http = HttpClient::with_timeout(Duration::from_secs(config.http.timeout_secs))?;

    let embedder = EmbeddingProviderFactory::create(&config.embedding, http.clone())?;
    let generation = GenerationProviderFactory::create(&config.generation, http)?;

    let retriever = VectorRetriever::new(store, config.knowledge_store.metric);
    let generator = ResponseGenerator::new(generation, config.generation.assistant_name.as_str())
        .with_max_output_tokens(config.generation.max_output_tokens);

    Ok(RagOrchestrator::new(
        create_intent_classifier(config),
        embedder,
        retriever,
        generator,
        config.knowledge_store.top_k,
    ))
}

/// Build the HTTP application state from configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> Result<AppState, DomainError> {
    let store = create_knowledge_store(config).await?;
    let orchestrator = create_orchestrator(config, store.clone()).await?;

    Ok(AppState::new(
        Arc::new(orchestrator),
        create_store_health_checker(config, store),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[tokio::test]
    async fn test_default_store_is_empty_in_memory() {
        let store = create_knowledge_store(&AppConfig::default()).await.unwrap();

        assert_eq!(store.store_type(), "in_memory");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_orchestrator() {
        let mut config = AppConfig::default();
        config.embedding.provider = ProviderKind::OpenAi;
        config.embedding.api_key_env = "COGNITIVE_CORE_TEST_UNSET_KEY".to_string();
        let store = create_knowledge_store(&config).await.unwrap();

        let result = create_orchestrator(&config, store).await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_health_checker_uses_embedding_dimensions() {
        let config = AppConfig::default();
        let store = create_knowledge_store(&config).await.unwrap();

        let report = create_store_health_checker(&config, store)
            .check()
            .await
            .unwrap();

        assert_eq!(report.expected_dimensions, 768);
        assert!(report.is_empty());
    }
}
