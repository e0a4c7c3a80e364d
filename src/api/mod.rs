//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api`. The OpenAPI document is served
//! at `/api-docs/openapi.json`, with Swagger UI at `/swagger-ui` when the
//! `swagger-ui` feature is enabled.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
#[cfg(not(feature = "swagger-ui"))]
use axum::{Json, routing::get};
use utoipa::OpenApi;

use crate::app_state::AppState;
pub use openapi::ApiDoc;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new().nest("/api", handlers::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        OPENAPI_PATH,
        get(|| async { Json(ApiDoc::openapi()) }),
    );

    router
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::persistence::PollGateway;
    use crate::persistence::memory::MemoryGateway;

    fn app(gateway: MemoryGateway) -> (Router, Arc<MemoryGateway>) {
        let gateway = Arc::new(gateway);
        let state = AppState::new(Arc::clone(&gateway) as Arc<dyn PollGateway>);
        (build_router().with_state(state), gateway)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = match app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_default()
    }

    fn vote_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/vote")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn get_polls_returns_default_poll() {
        let (app, _) = app(MemoryGateway::seeded().await);
        let (status, json) = send(&app, get_request("/api/polls")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["question"], "Favorite Cloud Provider?");
        assert_eq!(
            json["options"],
            serde_json::json!(["GCP", "AWS", "Azure", "Other"])
        );
        assert_eq!(
            json["votes"],
            serde_json::json!({"GCP": 0, "AWS": 0, "Azure": 0, "Other": 0})
        );
    }

    #[tokio::test]
    async fn get_polls_is_200_when_store_is_down() {
        let (app, _) = app(MemoryGateway::unreachable());
        let (status, json) = send(&app, get_request("/api/polls")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["votes"]["AWS"], 0);
    }

    #[tokio::test]
    async fn vote_returns_updated_tallies() {
        let (app, _) = app(MemoryGateway::seeded().await);
        let (status, json) = send(&app, vote_request(r#"{"option": "AWS"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Vote submitted successfully!");
        assert_eq!(json["current_votes"]["AWS"], 1);
        assert_eq!(json["current_votes"]["GCP"], 0);
    }

    #[tokio::test]
    async fn vote_without_option_is_400() {
        let (app, _) = app(MemoryGateway::seeded().await);
        for body in ["{}", "", "garbage"] {
            let (status, json) = send(&app, vote_request(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Missing 'option' in request body");
        }
    }

    #[tokio::test]
    async fn vote_for_unknown_option_is_400_and_changes_nothing() {
        let (app, gateway) = app(MemoryGateway::seeded().await);
        for body in [r#"{"option": "NotAnOption"}"#, r#"{"option": 3}"#] {
            let (status, json) = send(&app, vote_request(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Invalid option selected");
        }
        assert_eq!(gateway.tallies().await.map(|t| t.total()), Some(0));
    }

    #[tokio::test]
    async fn vote_with_no_poll_is_404() {
        let (app, _) = app(MemoryGateway::empty());
        let (status, json) = send(&app, vote_request(r#"{"option": "AWS"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No active poll found");
    }

    #[tokio::test]
    async fn failed_write_is_500() {
        let (app, gateway) = app(MemoryGateway::seeded().await);
        gateway.set_fail_writes(true);
        let (status, json) = send(&app, vote_request(r#"{"option": "AWS"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = json["error"].as_str().unwrap_or_default();
        assert!(message.starts_with("Database error: "));
    }

    #[tokio::test]
    async fn health_reports_database_state() {
        let (app, gateway) = app(MemoryGateway::seeded().await);
        let (status, json) = send(&app, get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({"status": "healthy", "database": "connected"})
        );

        gateway.set_unreachable(true);
        let (status, json) = send(&app, get_request("/api/health")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            serde_json::json!({"status": "healthy", "database": "not connected"})
        );
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _) = app(MemoryGateway::seeded().await);
        let (status, json) = send(&app, get_request(OPENAPI_PATH)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["paths"]["/api/vote"].is_object());
    }
}
