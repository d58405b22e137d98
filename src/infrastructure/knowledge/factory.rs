//! Knowledge store factory

use std::sync::Arc;

use super::{InMemoryKnowledgeStore, PgvectorKnowledgeStore};
use crate::config::{KnowledgeStoreConfig, KnowledgeStoreType};
use crate::domain::{DomainError, KnowledgeStore};

/// Factory for creating knowledge stores
#[derive(Debug)]
pub struct KnowledgeStoreFactory;

impl KnowledgeStoreFactory {
    /// Create the configured store
    pub async fn create(
        config: &KnowledgeStoreConfig,
    ) -> Result<Arc<dyn KnowledgeStore>, DomainError> {
        match config.store_type {
            KnowledgeStoreType::InMemory => match &config.snapshot_path {
                Some(path) => Ok(Arc::new(InMemoryKnowledgeStore::from_snapshot(path).await?)),
                None => Ok(Arc::new(InMemoryKnowledgeStore::new())),
            },
            KnowledgeStoreType::Pgvector => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    DomainError::configuration(
                        "knowledge_store.database_url is required for pgvector",
                    )
                })?;

                let store = PgvectorKnowledgeStore::connect(
                    database_url,
                    config.max_connections,
                    &config.table,
                )
                .await?;

                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = KnowledgeStoreFactory::create(&KnowledgeStoreConfig::default())
            .await
            .unwrap();

        assert_eq!(store.store_type(), "in_memory");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pgvector_requires_database_url() {
        let config = KnowledgeStoreConfig {
            store_type: KnowledgeStoreType::Pgvector,
            database_url: None,
            ..KnowledgeStoreConfig::default()
        };

        let result = KnowledgeStoreFactory::create(&config).await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_missing_snapshot_fails() {
        let config = KnowledgeStoreConfig {
            snapshot_path: Some("/nonexistent/snapshot.json".into()),
            ..KnowledgeStoreConfig::default()
        };

        assert!(KnowledgeStoreFactory::create(&config).await.is_err());
    }
}
