//! Knowledge store trait

use std::fmt::Debug;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{DistanceMetric, KnowledgeNode, ScoredNode};
use crate::domain::embedding::EmbeddingVector;
use crate::domain::DomainError;

/// Read access to the stored, embedded passages.
///
/// Implementations wrap a specific backend (in-memory, pgvector). The store
/// is read-only while serving; ingestion happens elsewhere.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeStore: Send + Sync + Debug {
    /// Get the backend name
    fn store_type(&self) -> &'static str;

    /// Up to `limit` nodes nearest to `vector` under `metric`, nearest first.
    /// An empty store yields an empty list.
    async fn nearest(
        &self,
        vector: &EmbeddingVector,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<ScoredNode>, DomainError>;

    /// Total number of stored nodes
    async fn count(&self) -> Result<usize, DomainError>;

    /// Oldest stored node, used by health checks
    async fn first(&self) -> Result<Option<KnowledgeNode>, DomainError>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}
