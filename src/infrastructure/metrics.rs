//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsConfig;
use crate::domain::{IntentResult, PipelineStage};

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish()
    }
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("cognitive_core_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at /metrics");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router<S>(metrics: PrometheusMetrics) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric; `path` is the matched route template
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one intent classification
pub fn record_classification(result: &IntentResult) {
    let path = if result.is_heuristic() {
        "heuristic"
    } else {
        "neural"
    };
    let labels = [
        ("path", path.to_string()),
        ("intent", result.intent().as_str().to_string()),
    ];

    counter!("intent_classifications_total", &labels).increment(1);

    if result.is_confused() {
        counter!("intent_confused_queries_total", "path" => path).increment(1);
    }
}

/// Record an inference failure that fell back to the heuristic
pub fn record_inference_fallback() {
    counter!("intent_inference_fallbacks_total").increment(1);
}

/// Record a call to an embedding, retrieval or generation backend
pub fn record_upstream_call(params: UpstreamCallMetricParams) {
    let labels = [
        ("service", params.service.to_string()),
        ("provider", params.provider.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("upstream_requests_total", &labels).increment(1);
    histogram!("upstream_request_duration_seconds", &labels)
        .record(params.duration.as_secs_f64());
}

/// Parameters for upstream call metrics
pub struct UpstreamCallMetricParams<'a> {
    pub service: &'a str,
    pub provider: &'a str,
    pub duration: Duration,
    pub success: bool,
}

/// Record one pipeline run; `failed_before` is the stage that was not reached
pub fn record_pipeline_run(failed_before: Option<PipelineStage>, duration: Duration) {
    let (outcome, stage) = match failed_before {
        None => ("success", PipelineStage::Generated.as_str()),
        Some(stage) => ("error", stage.as_str()),
    };
    let labels = [("outcome", outcome.to_string()), ("stage", stage.to_string())];

    counter!("rag_pipeline_runs_total", &labels).increment(1);
    histogram!("rag_pipeline_duration_seconds", &labels).record(duration.as_secs_f64());
}
