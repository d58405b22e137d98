//! Intent classification endpoint

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, IntentRequest, Json};
use crate::domain::IntentResult;

/// POST /v1/intent
pub async fn classify_intent(
    State(state): State<AppState>,
    Json(request): Json<IntentRequest>,
) -> Result<Json<IntentResult>, ApiError> {
    let query = request.into_query().map_err(|e| ApiError::from(e).with_param("query"))?;

    let result = state.classifier().classify(query.text()).await;

    info!(
        intent = %result.intent(),
        confidence = result.confidence(),
        model_version = result.model_version(),
        "Classified query"
    );

    Ok(Json(result))
}
