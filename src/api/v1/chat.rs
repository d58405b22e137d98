//! Retrieval-augmented chat endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, Json};
use crate::domain::RagResult;

/// POST /v1/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<RagResult>, ApiError> {
    let query = request
        .into_query()
        .map_err(|e| ApiError::from(e).with_param("messages"))?;

    let result = state.orchestrator.run(&query).await?;

    Ok(Json(result))
}
