//! API info and health handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiInfo, ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /
pub async fn info() -> Json<ApiResponse<ApiInfo>> {
    Json(ApiResponse::ok(ApiInfo {
        name: "Event Horizon API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Events, event data, alerts and reports over a JWT-secured REST API"
            .to_string(),
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.database {
        None => "in-memory",
        Some(db) => db.status().await.label(),
    };

    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
