//! Intent classification service: neural model with keyword fallback

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::intent::heuristic;
use crate::domain::{IntentResult, ModelState};
use crate::infrastructure::intent::ModelLoader;
use crate::infrastructure::metrics;

/// Classifies queries with the trained model when one is loaded, otherwise
/// with the keyword rules. Never fails.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    loader: Arc<ModelLoader>,
}

impl IntentClassifier {
    pub fn new(loader: Arc<ModelLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<ModelLoader> {
        &self.loader
    }

    /// Load the model if needed; idempotent once a load has succeeded
    pub async fn initialize(&self) -> ModelState {
        self.loader.load().await
    }

    /// Load the model if needed and classify
    pub async fn classify(&self, query: &str) -> IntentResult {
        let state = self.initialize().await;
        self.classify_with_state(state, query).await
    }

    /// Classify on the blocking pool using an already resolved model state
    pub async fn classify_with_state(&self, state: ModelState, query: &str) -> IntentResult {
        let owned_query = query.to_string();

        match tokio::task::spawn_blocking(move || classify_blocking(&state, &owned_query)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Classification task failed, using keyword heuristic");
                metrics::record_inference_fallback();
                let result = heuristic::classify(query);
                metrics::record_classification(&result);
                result
            }
        }
    }
}

/// Classify synchronously. Runs inference when a model is loaded.
pub fn classify_blocking(state: &ModelState, query: &str) -> IntentResult {
    let result = match state {
        ModelState::Loaded(model) => {
            let is_confused = heuristic::detect_confusion(&query.to_lowercase());

            match model.predict(query, is_confused) {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "Intent inference failed, using keyword heuristic");
                    metrics::record_inference_fallback();
                    heuristic::classify(query)
                }
            }
        }
        ModelState::Unavailable => heuristic::classify(query),
    };

    debug!(
        intent = %result.intent(),
        confidence = result.confidence(),
        is_confused = result.is_confused(),
        model_version = result.model_version(),
        "Classified query"
    );
    metrics::record_classification(&result);

    result
}
