use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub cache: String,
}

impl HealthResponse {
    pub fn up(store: &str, cache: &str) -> Self {
        Self {
            status: "UP".to_string(),
            store: store.to_string(),
            cache: cache.to_string(),
        }
    }

    pub fn down(store: &str, cache: &str) -> Self {
        Self {
            status: "DOWN".to_string(),
            store: store.to_string(),
            cache: cache.to_string(),
        }
    }
}

/// GET /health
/// The cache is never a reason to report DOWN; only the store is.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.store().name();
    let cache = state.cache().name();

    match state.store().health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::up(store, cache))),
        Err(e) => {
            tracing::warn!(store = %store, error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::down(store, cache)),
            )
        },
    }
}
