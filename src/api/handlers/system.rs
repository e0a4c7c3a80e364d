//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"`; the process is up if it can answer.
    pub status: String,
    /// `"connected"` or `"not connected"`.
    pub database: String,
}

/// `GET /api/health` — Service health and database connectivity.
///
/// Losing the database is a degraded condition, reported with a 500 so
/// probes notice, but the body still says the service is healthy.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "System",
    summary = "Health check",
    description = "Attempts a database connection and reports whether it succeeded.",
    responses(
        (status = 200, description = "Database connected", body = HealthResponse),
        (status = 500, description = "Database not connected", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.poll_service.health_check().await;
    let (status, database) = if health.database_connected {
        (StatusCode::OK, "connected")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "not connected")
    };
    (
        status,
        Json(HealthResponse {
            status: "healthy".to_string(),
            database: database.to_string(),
        }),
    )
}

/// System routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
