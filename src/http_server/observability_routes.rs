//! Observability HTTP Routes
//!
//! `/health` reports the build version and whether the catalog answers a
//! ping within the query deadline.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::inspector_routes::InspectorState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub checked_at: String,
}

/// Health check route at root level
pub fn health_routes(state: Arc<InspectorState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<InspectorState>>) -> impl IntoResponse {
    let (code, status, database) = match state.inspector.ping().await {
        Ok(()) => (StatusCode::OK, "ok", "reachable"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        checked_at: chrono::Utc::now().to_rfc3339(),
    };

    (code, Json(response))
}
