//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod generation;
pub mod intent;
pub mod knowledge;
pub mod rag;

pub use embedding::{EmbeddingProvider, EmbeddingVector};
pub use error::DomainError;
pub use generation::{GenerationProvider, GenerationRequest, GenerationResponse, PromptPart};
pub use intent::{
    InferenceError, Intent, IntentResult, LabelMap, LoadedModel, ModelState, SequenceClassifier,
};
pub use knowledge::{
    DistanceMetric, KnowledgeNode, KnowledgeStore, RetrievedContext, ScoredNode,
};
pub use rag::{PipelineStage, Query, RagError, RagResult};
