//! Shared state handed to every handler

use std::sync::Arc;

use crate::infrastructure::services::{IntentClassifier, RagOrchestrator, StoreHealthChecker};

#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Arc<RagOrchestrator>,
    pub store_health: StoreHealthChecker,
}

impl AppState {
    pub fn new(orchestrator: Arc<RagOrchestrator>, store_health: StoreHealthChecker) -> Self {
        Self {
            orchestrator,
            store_health,
        }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        self.orchestrator.classifier()
    }
}
