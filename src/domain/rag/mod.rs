//! Retrieval-augmented answering domain: queries, pipeline stages, results

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::intent::IntentResult;
use crate::domain::DomainError;

/// A student query for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    context: Map<String, Value>,
}

impl Query {
    /// Create a query, rejecting blank text
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(DomainError::validation("Query must not be empty"));
        }

        Ok(Self {
            text,
            context: Map::new(),
        })
    }

    /// Attach the caller's free-form context map
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }
}

/// States a query passes through in the answering pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    IntentResolved,
    Embedded,
    Retrieved,
    Generated,
}

impl PipelineStage {
    /// Stage reached after this one completes; `Generated` is terminal
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::IntentResolved),
            Self::IntentResolved => Some(Self::Embedded),
            Self::Embedded => Some(Self::Retrieved),
            Self::Retrieved => Some(Self::Generated),
            Self::Generated => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::IntentResolved => "intent_resolved",
            Self::Embedded => "embedded",
            Self::Retrieved => "retrieved",
            Self::Generated => "generated",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of the answering pipeline as seen by callers.
///
/// Only the stage that could not be reached is exposed; the cause is logged
/// where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unable to answer the query right now (failed before reaching {target})")]
pub struct RagError {
    target: PipelineStage,
}

impl RagError {
    pub fn new(target: PipelineStage) -> Self {
        Self { target }
    }

    /// Stage the pipeline was trying to reach when it failed
    pub fn target(&self) -> PipelineStage {
        self.target
    }
}

/// Terminal output of the answering pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResult {
    pub response: String,
    pub intent: IntentResult,
    pub context_used: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::{Intent, HEURISTIC_MODEL_VERSION};

    #[test]
    fn test_query_rejects_blank_text() {
        assert!(Query::new("   ").is_err());
        assert!(Query::new("").is_err());
        assert_eq!(Query::new("What is a trie?").unwrap().text(), "What is a trie?");
    }

    #[test]
    fn test_query_context() {
        let mut context = Map::new();
        context.insert("topic".to_string(), Value::from("graphs"));

        let query = Query::new("Explain BFS").unwrap().with_context(context);

        assert_eq!(query.context()["topic"], "graphs");
    }

    #[test]
    fn test_stage_sequence() {
        let mut stage = PipelineStage::Start;
        let mut visited = vec![stage];

        while let Some(next) = stage.next() {
            visited.push(next);
            stage = next;
        }

        assert_eq!(
            visited,
            vec![
                PipelineStage::Start,
                PipelineStage::IntentResolved,
                PipelineStage::Embedded,
                PipelineStage::Retrieved,
                PipelineStage::Generated,
            ]
        );
    }

    #[test]
    fn test_rag_error_hides_cause() {
        let error = RagError::new(PipelineStage::Embedded);

        assert_eq!(error.target(), PipelineStage::Embedded);
        assert_eq!(
            error.to_string(),
            "Unable to answer the query right now (failed before reaching embedded)"
        );
    }

    #[test]
    fn test_rag_result_serialization() {
        let result = RagResult {
            response: "Recursion is...".to_string(),
            intent: IntentResult::new(
                Intent::ConceptLearning,
                0.85,
                false,
                HEURISTIC_MODEL_VERSION,
            ),
            context_used: true,
        };

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["context_used"], true);
        assert_eq!(json["intent"]["intent"], "concept_learning");
    }
}
