//! HTTP router.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use insight_llm::TextGenerator;

use crate::state::AppState;
use crate::websocket::ws_handler;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let metrics_handle = state.metrics.clone();

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/metrics", get(move || async move { metrics_handle.render() }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "llm_ready": state.llm.is_ready(),
        "listeners": state.broadcaster.count(),
    }))
}
