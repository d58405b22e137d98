//! Knowledge node entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::embedding::EmbeddingVector;

/// One stored, embedded passage of reference content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    /// Unique identifier within the store
    pub id: String,
    /// Human readable title
    pub title: String,
    /// Passage text
    pub content: String,
    /// Embedding of the passage
    pub embedding: EmbeddingVector,
    /// Path of the content file the passage was built from
    #[serde(default)]
    pub source_path: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl KnowledgeNode {
    /// Create a new node stamped with the current time
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            embedding: EmbeddingVector::new(embedding),
            source_path: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Set the source path
    pub fn with_source_path(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = source_path.into();
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A node paired with its distance to a query vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNode {
    pub node: KnowledgeNode,
    /// Distance under the metric used for the search; lower is nearer
    pub distance: f32,
}

impl ScoredNode {
    pub fn new(node: KnowledgeNode, distance: f32) -> Self {
        Self { node, distance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = KnowledgeNode::new("n-1", "Recursion", "A function calling itself", vec![0.1])
            .with_source_path("content/dsa/recursion.json");

        assert_eq!(node.id, "n-1");
        assert_eq!(node.embedding.dimensions(), 1);
        assert_eq!(node.source_path, "content/dsa/recursion.json");
    }

    #[test]
    fn test_node_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": "n-2",
            "title": "Stacks",
            "content": "LIFO structure",
            "embedding": [0.0, 1.0]
        });

        let node: KnowledgeNode = serde_json::from_value(json).unwrap();

        assert_eq!(node.source_path, "");
        assert_eq!(node.embedding.values(), &[0.0, 1.0]);
    }
}
