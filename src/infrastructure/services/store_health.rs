//! Knowledge store health check: node count, embedding size and self-match

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{DistanceMetric, DomainError, KnowledgeStore};

/// Result of inspecting the knowledge store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreHealthReport {
    pub store_type: String,
    pub node_count: usize,
    /// Embedding size of the sampled node; `None` for an empty store and
    /// `Some(0)` when its embedding is NULL
    pub dimensions: Option<usize>,
    pub expected_dimensions: usize,
    /// Whether the sampled node is its own nearest neighbour
    pub self_match: Option<bool>,
}

impl StoreHealthReport {
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Failed checks; an empty store has none
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.dimensions == Some(0) {
            problems.push("sampled node embedding is NULL".to_string());
        } else if let Some(dimensions) = self.dimensions {
            if dimensions != self.expected_dimensions {
                problems.push(format!(
                    "embedding dimension {} does not match expected {}",
                    dimensions, self.expected_dimensions
                ));
            }
        }

        if self.self_match == Some(false) {
            problems.push("sampled node is not its own nearest neighbour".to_string());
        }

        problems
    }

    pub fn is_healthy(&self) -> bool {
        self.problems().is_empty()
    }
}

/// Runs the store health check
#[derive(Debug, Clone)]
pub struct StoreHealthChecker {
    store: Arc<dyn KnowledgeStore>,
    metric: DistanceMetric,
    expected_dimensions: usize,
}

impl StoreHealthChecker {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        metric: DistanceMetric,
        expected_dimensions: usize,
    ) -> Self {
        Self {
            store,
            metric,
            expected_dimensions,
        }
    }

    pub async fn check(&self) -> Result<StoreHealthReport, DomainError> {
        let mut report = StoreHealthReport {
            store_type: self.store.store_type().to_string(),
            node_count: self.store.count().await?,
            dimensions: None,
            expected_dimensions: self.expected_dimensions,
            self_match: None,
        };

        if report.is_empty() {
            warn!(store = %report.store_type, "Knowledge store is empty");
            return Ok(report);
        }

        let Some(sample) = self.store.first().await? else {
            return Ok(report);
        };

        report.dimensions = Some(sample.embedding.dimensions());

        if sample.embedding.is_empty() {
            warn!(
                store = %report.store_type,
                node = %sample.id,
                "Sampled knowledge node has no embedding"
            );
            return Ok(report);
        }

        let nearest = self.store.nearest(&sample.embedding, self.metric, 1).await?;
        report.self_match = Some(nearest.first().is_some_and(|hit| hit.node.id == sample.id));

        if report.is_healthy() {
            info!(
                store = %report.store_type,
                nodes = report.node_count,
                "Knowledge store is healthy"
            );
        } else {
            warn!(
                store = %report.store_type,
                problems = ?report.problems(),
                "Knowledge store check failed"
            );
        }

        Ok(report)
    }
}
