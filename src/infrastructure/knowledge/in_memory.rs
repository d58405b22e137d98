//! In-memory knowledge store for development and testing

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::embedding::EmbeddingVector;
use crate::domain::knowledge::{DistanceMetric, KnowledgeNode, KnowledgeStore, ScoredNode};
use crate::domain::DomainError;

/// Brute-force knowledge store for running without PostgreSQL
#[derive(Debug, Default)]
pub struct InMemoryKnowledgeStore {
    nodes: Arc<RwLock<Vec<KnowledgeNode>>>,
}

impl InMemoryKnowledgeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<KnowledgeNode>) -> Self {
        Self {
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    /// Seed a store from a JSON array of knowledge nodes
    pub async fn from_snapshot(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::knowledge_store(format!(
                "Failed to read snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        let nodes: Vec<KnowledgeNode> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::knowledge_store(format!(
                "Invalid snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            nodes = nodes.len(),
            "Loaded knowledge snapshot"
        );

        Ok(Self::from_nodes(nodes))
    }

    pub async fn insert(&self, node: KnowledgeNode) {
        self.nodes.write().await.push(node);
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    fn store_type(&self) -> &'static str {
        "in_memory"
    }

    async fn nearest(
        &self,
        vector: &EmbeddingVector,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<ScoredNode>, DomainError> {
        let nodes = self.nodes.read().await;

        // Nodes embedded with a different model cannot be compared
        let mut scored: Vec<ScoredNode> = nodes
            .iter()
            .filter(|node| node.embedding.dimensions() == vector.dimensions())
            .map(|node| {
                let distance = metric.distance(node.embedding.values(), vector.values());
                ScoredNode::new(node.clone(), distance)
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(limit);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.nodes.read().await.len())
    }

    async fn first(&self) -> Result<Option<KnowledgeNode>, DomainError> {
        let nodes = self.nodes.read().await;
        Ok(nodes.iter().min_by_key(|node| node.created_at).cloned())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn node(id: &str, embedding: Vec<f32>) -> KnowledgeNode {
        KnowledgeNode::new(id, id, format!("content of {}", id), embedding)
            .with_source_path(format!("content/{}.json", id))
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryKnowledgeStore::new();
        let query = EmbeddingVector::new(vec![1.0, 0.0]);

        let results = store.nearest(&query, DistanceMetric::Cosine, 5).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.first().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nearest_sorted_ascending() {
        let store = InMemoryKnowledgeStore::from_nodes(vec![
            node("far", vec![0.0, 1.0]),
            node("near", vec![1.0, 0.0]),
            node("middle", vec![1.0, 1.0]),
        ]);
        let query = EmbeddingVector::new(vec![1.0, 0.0]);

        let results = store.nearest(&query, DistanceMetric::Cosine, 5).await.unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.node.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "middle", "far"]);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[tokio::test]
    async fn test_limit_bounds_results() {
        let store = InMemoryKnowledgeStore::from_nodes(
            (0..10).map(|i| node(&format!("n{}", i), vec![1.0, i as f32])).collect(),
        );
        let query = EmbeddingVector::new(vec![1.0, 0.0]);

        let top = store.nearest(&query, DistanceMetric::Euclidean, 3).await.unwrap();
        let all = store.nearest(&query, DistanceMetric::Euclidean, 50).await.unwrap();

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].node.id, "n0");
        assert_eq!(all.len(), 10);
    }

    #[tokio::test]
    async fn test_dot_product_prefers_larger_product() {
        let store = InMemoryKnowledgeStore::from_nodes(vec![
            node("small", vec![0.1, 0.1]),
            node("large", vec![2.0, 2.0]),
        ]);
        let query = EmbeddingVector::new(vec![1.0, 1.0]);

        let results = store
            .nearest(&query, DistanceMetric::DotProduct, 1)
            .await
            .unwrap();

        assert_eq!(results[0].node.id, "large");
    }

    #[tokio::test]
    async fn test_skips_nodes_with_other_dimensions() {
        let store = InMemoryKnowledgeStore::from_nodes(vec![
            node("two", vec![1.0, 0.0]),
            node("three", vec![1.0, 0.0, 0.0]),
        ]);
        let query = EmbeddingVector::new(vec![1.0, 0.0]);

        let results = store.nearest(&query, DistanceMetric::Cosine, 5).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].node.id, "two");
    }

    #[tokio::test]
    async fn test_first_is_oldest() {
        let now = Utc::now();
        let store = InMemoryKnowledgeStore::new();
        store.insert(node("newer", vec![1.0]).with_created_at(now)).await;
        store
            .insert(node("older", vec![1.0]).with_created_at(now - Duration::days(1)))
            .await;

        let first = store.first().await.unwrap().unwrap();

        assert_eq!(first.id, "older");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_from_snapshot() {
        let dir = std::env::temp_dir().join(format!("kn-snapshot-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("nodes.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "1", "title": "Recursion", "content": "A function that calls itself",
                 "embedding": [0.5, 0.5], "source_path": "content/recursion.json"},
                {"id": "2", "title": "Stacks", "content": "LIFO", "embedding": [0.1, 0.9]}
            ]"#,
        )
        .unwrap();

        let store = InMemoryKnowledgeStore::from_snapshot(&path).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_snapshot() {
        let result = InMemoryKnowledgeStore::from_snapshot("/nonexistent/nodes.json").await;

        assert!(matches!(result, Err(DomainError::KnowledgeStore { .. })));
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = InMemoryKnowledgeStore::new();

        assert!(store.health_check().await.unwrap());
        assert_eq!(store.store_type(), "in_memory");
    }
}
