//! Knowledge store domain: nodes, distance metrics, retrieval results

mod context;
mod metric;
mod node;
mod store;

pub use context::{RetrievedContext, CONTEXT_DELIMITER};
pub use metric::DistanceMetric;
pub use node::{KnowledgeNode, ScoredNode};
pub use store::KnowledgeStore;

#[cfg(test)]
pub use store::MockKnowledgeStore;
