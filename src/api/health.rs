//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::infrastructure::services::StoreHealthReport;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /ready
///
/// Unhealthy (503) only when the knowledge store cannot be queried. Running
/// on the keyword heuristic or a failed store self-check is reported as
/// degraded.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let checks = vec![
        check_knowledge_store(&state).await,
        check_classifier(&state).await,
    ];

    let status = overall_status(&checks);
    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (status_code, Json(response))
}

fn overall_status(checks: &[HealthCheck]) -> HealthStatus {
    if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

async fn check_knowledge_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let (status, message) = match state.store_health.check().await {
        Ok(report) => store_status(&report),
        Err(e) => {
            tracing::warn!(error = %e, "Knowledge store readiness check failed");
            (HealthStatus::Unhealthy, Some("knowledge store unreachable".to_string()))
        }
    };

    HealthCheck {
        name: "knowledge_store".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

fn store_status(report: &StoreHealthReport) -> (HealthStatus, Option<String>) {
    if report.is_empty() {
        return (HealthStatus::Degraded, Some("knowledge store is empty".to_string()));
    }

    let problems = report.problems();
    if problems.is_empty() {
        (HealthStatus::Healthy, Some(format!("{} nodes", report.node_count)))
    } else {
        (HealthStatus::Degraded, Some(problems.join("; ")))
    }
}

async fn check_classifier(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let model_state = state.classifier().initialize().await;

    let (status, message) = if model_state.is_loaded() {
        (HealthStatus::Healthy, "intent model loaded")
    } else {
        (HealthStatus::Degraded, "using keyword heuristic")
    };

    HealthCheck {
        name: "intent_classifier".to_string(),
        status,
        message: Some(message.to_string()),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}
