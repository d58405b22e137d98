//! Versioned API endpoints

pub mod chat;
pub mod intent;

use axum::{routing::post, Router};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/intent", post(intent::classify_intent))
        .route("/chat", post(chat::chat))
}
