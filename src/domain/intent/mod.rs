//! Intent classification domain

mod entity;
pub mod heuristic;
mod model;

pub use entity::{
    Intent, IntentResult, UnknownIntent, HEURISTIC_MODEL_VERSION, NEURAL_MODEL_VERSION,
};
pub use heuristic::HEURISTIC_CONFIDENCE;
pub use model::{softmax, InferenceError, LabelMap, LoadedModel, ModelState, SequenceClassifier};

#[cfg(test)]
pub use model::mock::{training_labels, FixedLogits};
