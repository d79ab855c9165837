//! Route table.

pub mod ai;
pub mod health;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/ai-autocomplete", post(ai::autocomplete))
        .route("/api/ai-help", post(ai::help))
        .route("/api/generate-title", post(ai::generate_title))
        .with_state(state)
}
