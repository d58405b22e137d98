//! Neural classifier abstraction
//!
//! `ModelState` is the tagged variant the classifier matches on. A loaded
//! model bundles the network (tokenizer + weights) with the inverted label
//! map.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

use super::entity::{Intent, IntentResult, NEURAL_MODEL_VERSION};

/// Runtime failure while running the neural classifier
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    #[error("Forward pass failed: {0}")]
    Forward(String),

    #[error("Model returned no logits")]
    EmptyLogits,

    #[error("Model returned non-finite logits")]
    NonFiniteLogits,
}

/// A sequence classification network: text in, one logit per class out
pub trait SequenceClassifier: Send + Sync + Debug {
    /// Tokenize the text and run a forward pass
    fn logits(&self, text: &str) -> Result<Vec<f32>, InferenceError>;
}

/// Class index to label lookup, built by inverting a label → index map
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    by_index: HashMap<usize, String>,
}

impl LabelMap {
    /// Invert a label → index map as stored next to the model weights
    pub fn from_label_indices(labels: HashMap<String, usize>) -> Self {
        let by_index = labels.into_iter().map(|(label, idx)| (idx, label)).collect();
        Self { by_index }
    }

    /// Label stored for a class index
    pub fn label(&self, index: usize) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    /// Intent for a class index; unknown indices and unknown labels resolve
    /// to `ExploratoryQuestion`
    pub fn intent(&self, index: usize) -> Intent {
        self.label(index)
            .map(Intent::from_label_or_default)
            .unwrap_or(Intent::ExploratoryQuestion)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

/// A classifier artifact that finished loading
#[derive(Debug)]
pub struct LoadedModel {
    network: Box<dyn SequenceClassifier>,
    labels: LabelMap,
}

impl LoadedModel {
    pub fn new(network: Box<dyn SequenceClassifier>, labels: LabelMap) -> Self {
        Self { network, labels }
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Run the network and pick the most probable intent.
    ///
    /// `is_confused` comes from the rule-based detector and is passed through.
    pub fn predict(&self, query: &str, is_confused: bool) -> Result<IntentResult, InferenceError> {
        let logits = self.network.logits(query)?;

        if logits.is_empty() {
            return Err(InferenceError::EmptyLogits);
        }

        if logits.iter().any(|l| !l.is_finite()) {
            return Err(InferenceError::NonFiniteLogits);
        }

        let probabilities = softmax(&logits);
        let (class_index, confidence) = argmax(&probabilities);

        Ok(IntentResult::new(
            self.labels.intent(class_index),
            confidence,
            is_confused,
            NEURAL_MODEL_VERSION,
        ))
    }
}

/// Whether a trained classifier is available
#[derive(Debug, Clone)]
pub enum ModelState {
    Loaded(Arc<LoadedModel>),
    Unavailable,
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest element; ties go to the lowest index
fn argmax(values: &[f32]) -> (usize, f32) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (idx, value)| {
            if value > best.1 {
                (idx, value)
            } else {
                best
            }
        })
}
