//! Application services composing the domain with the adapters

mod intent_classifier;
mod orchestrator;
mod response_generator;
mod retriever;
mod store_health;

pub use intent_classifier::{classify_blocking, IntentClassifier};
pub use orchestrator::RagOrchestrator;
pub use response_generator::{ResponseGenerator, GENERATION_TEMPERATURE};
pub use retriever::VectorRetriever;
pub use store_health::{StoreHealthChecker, StoreHealthReport};
