//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{PollResponse, VoteRequest, VoteResponse};
use super::handlers::system::HealthResponse;
use crate::error::ErrorResponse;

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "poll-gateway",
        description = "Single-poll voting API with in-memory fallback"
    ),
    paths(
        super::handlers::poll::get_poll,
        super::handlers::poll::submit_vote,
        super::handlers::system::health_handler,
    ),
    components(schemas(
        PollResponse,
        VoteRequest,
        VoteResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Polls", description = "Current poll and voting"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;
