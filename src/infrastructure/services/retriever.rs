use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::domain::{
    DistanceMetric, DomainError, EmbeddingVector, KnowledgeStore, RetrievedContext,
};
use crate::infrastructure::metrics::{self, UpstreamCallMetricParams};

/// Nearest-passage lookup against the knowledge store
#[derive(Debug, Clone)]
pub struct VectorRetriever {
    store: Arc<dyn KnowledgeStore>,
    metric: DistanceMetric,
}

impl VectorRetriever {
    pub fn new(store: Arc<dyn KnowledgeStore>, metric: DistanceMetric) -> Self {
        Self { store, metric }
    }

    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// The `k` nearest passages, nearest first. An empty store gives an empty
    /// context, not an error.
    pub async fn retrieve(
        &self,
        vector: &EmbeddingVector,
        k: usize,
    ) -> Result<RetrievedContext, DomainError> {
        if k == 0 {
            return Ok(RetrievedContext::empty());
        }

        let started = Instant::now();
        let result = self.store.nearest(vector, self.metric, k).await;

        metrics::record_upstream_call(UpstreamCallMetricParams {
            service: "retrieval",
            provider: self.store.store_type(),
            duration: started.elapsed(),
            success: result.is_ok(),
        });

        let entries = result.inspect_err(|e| {
            error!(
                store = self.store.store_type(),
                metric = %self.metric,
                error = %e,
                "Knowledge store search failed"
            );
        })?;

        let context = RetrievedContext::from_results(entries, k);

        debug!(
            store = self.store.store_type(),
            metric = %self.metric,
            requested = k,
            found = context.len(),
            "Retrieved context"
        );

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::MockKnowledgeStore;
    use crate::domain::{KnowledgeNode, ScoredNode};
    use crate::infrastructure::knowledge::InMemoryKnowledgeStore;

    fn node(id: &str, embedding: Vec<f32>) -> KnowledgeNode {
        KnowledgeNode::new(id, id, format!("about {}", id), embedding)
            .with_source_path(format!("content/{}.json", id))
    }

    #[tokio::test]
    async fn test_empty_store_gives_empty_context() {
        let retriever =
            VectorRetriever::new(Arc::new(InMemoryKnowledgeStore::new()), DistanceMetric::Cosine);

        let context = retriever
            .retrieve(&EmbeddingVector::new(vec![1.0, 0.0]), 5)
            .await
            .unwrap();

        assert!(context.is_empty());
        assert_eq!(context.render(), "");
    }

    #[tokio::test]
    async fn test_k_larger_than_store_returns_all() {
        let store = InMemoryKnowledgeStore::from_nodes(vec![
            node("a", vec![1.0, 0.0]),
            node("b", vec![0.0, 1.0]),
        ]);
        let retriever = VectorRetriever::new(Arc::new(store), DistanceMetric::Cosine);

        let context = retriever
            .retrieve(&EmbeddingVector::new(vec![1.0, 0.1]), 10)
            .await
            .unwrap();

        assert_eq!(context.len(), 2);
        assert_eq!(context.top().unwrap().node.id, "a");
        assert_eq!(
            context.render(),
            "[Source: content/a.json]\nabout a\n\n---\n\n[Source: content/b.json]\nabout b"
        );
    }

    #[tokio::test]
    async fn test_results_are_reordered_and_bounded() {
        let mut store = MockKnowledgeStore::new();
        store.expect_store_type().return_const("mock");
        store
            .expect_nearest()
            .withf(|_, metric, limit| *metric == DistanceMetric::Euclidean && *limit == 2)
            .returning(|_, _, _| {
                Ok(vec![
                    ScoredNode::new(node("far", vec![0.0]), 3.0),
                    ScoredNode::new(node("near", vec![0.0]), 0.5),
                    ScoredNode::new(node("mid", vec![0.0]), 1.0),
                ])
            });
        let retriever = VectorRetriever::new(Arc::new(store), DistanceMetric::Euclidean);

        let context = retriever
            .retrieve(&EmbeddingVector::new(vec![0.0]), 2)
            .await
            .unwrap();

        let ids: Vec<&str> = context.entries().iter().map(|e| e.node.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockKnowledgeStore::new();
        store.expect_store_type().return_const("mock");
        store
            .expect_nearest()
            .returning(|_, _, _| Err(DomainError::knowledge_store("connection refused")));
        let retriever = VectorRetriever::new(Arc::new(store), DistanceMetric::Cosine);

        let result = retriever.retrieve(&EmbeddingVector::new(vec![1.0]), 5).await;

        assert!(matches!(result, Err(DomainError::KnowledgeStore { .. })));
    }

    #[tokio::test]
    async fn test_zero_k_skips_store() {
        let store = MockKnowledgeStore::new();
        let retriever = VectorRetriever::new(Arc::new(store), DistanceMetric::Cosine);

        let context = retriever
            .retrieve(&EmbeddingVector::new(vec![1.0]), 0)
            .await
            .unwrap();

        assert!(context.is_empty());
    }
}
