use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Unauthenticated liveness probe that also pings storage
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let storage = state.config.storage_backend.as_str();

    match state.vehicles.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "storage": storage,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "❌ Health check fallido");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "storage": storage })),
            )
        }
    }
}
