//! RAG orchestrator: classify, embed, retrieve, generate

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument};

use super::{IntentClassifier, ResponseGenerator, VectorRetriever};
use crate::domain::{
    DomainError, EmbeddingProvider, EmbeddingVector, PipelineStage, Query, RagError, RagResult,
};
use crate::infrastructure::metrics::{self, UpstreamCallMetricParams};

/// Runs one query through the answering pipeline.
///
/// Stages run strictly in order:
/// `start → intent_resolved → embedded → retrieved → generated`.
/// Classification always succeeds; any other stage failure aborts the run.
#[derive(Debug, Clone)]
pub struct RagOrchestrator {
    classifier: IntentClassifier,
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: VectorRetriever,
    generator: ResponseGenerator,
    top_k: usize,
}

impl RagOrchestrator {
    pub fn new(
        classifier: IntentClassifier,
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: VectorRetriever,
        generator: ResponseGenerator,
        top_k: usize,
    ) -> Self {
        Self {
            classifier,
            embedder,
            retriever,
            generator,
            top_k,
        }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn retriever(&self) -> &VectorRetriever {
        &self.retriever
    }

    /// Answer a query. Only the stage that was not reached is reported on
    /// failure; the cause is logged here.
    #[instrument(skip(self, query), fields(query_len = query.text().len()))]
    pub async fn run(&self, query: &Query) -> Result<RagResult, RagError> {
        let started = Instant::now();
        let outcome = self.run_stages(query).await;

        let failed_before = outcome.as_ref().err().map(RagError::target);
        metrics::record_pipeline_run(failed_before, started.elapsed());

        match &outcome {
            Ok(result) => info!(
                intent = %result.intent.intent(),
                context_used = result.context_used,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Answered query"
            ),
            Err(e) => error!(failed_before = %e.target(), "Pipeline aborted"),
        }

        outcome
    }

    async fn run_stages(&self, query: &Query) -> Result<RagResult, RagError> {
        let model_state = self.classifier.initialize().await;

        let intent = self
            .classifier
            .classify_with_state(model_state, query.text())
            .await;
        debug!(
            stage = %PipelineStage::IntentResolved,
            intent = %intent.intent(),
            "Stage complete"
        );

        let vector = self
            .embed(query.text())
            .await
            .map_err(|e| stage_failed(PipelineStage::Embedded, e))?;
        debug!(
            stage = %PipelineStage::Embedded,
            dimensions = vector.dimensions(),
            "Stage complete"
        );

        let context = self
            .retriever
            .retrieve(&vector, self.top_k)
            .await
            .map_err(|e| stage_failed(PipelineStage::Retrieved, e))?;
        debug!(stage = %PipelineStage::Retrieved, passages = context.len(), "Stage complete");

        let response = self
            .generator
            .generate(query.text(), &context, intent.intent())
            .await
            .map_err(|e| stage_failed(PipelineStage::Generated, e))?;
        debug!(stage = %PipelineStage::Generated, "Stage complete");

        Ok(RagResult {
            response,
            intent,
            context_used: !context.is_empty(),
        })
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        let started = Instant::now();
        let result = self.embedder.embed(text).await;

        metrics::record_upstream_call(UpstreamCallMetricParams {
            service: "embedding",
            provider: self.embedder.provider_name(),
            duration: started.elapsed(),
            success: result.is_ok(),
        });

        result
    }
}

fn stage_failed(target: PipelineStage, cause: DomainError) -> RagError {
    error!(stage = %target, error = %cause, "Pipeline stage failed");
    RagError::new(target)
}
