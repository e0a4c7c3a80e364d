//! Poll handlers: read the current poll and submit votes.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{PollResponse, VoteRequest, VoteResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, PollError};

/// `GET /api/polls` — Current poll with vote tallies.
#[utoipa::path(
    get,
    path = "/api/polls",
    tag = "Polls",
    summary = "Get the current poll",
    description = "Returns the question, options, and vote counts of the most recent poll. Serves the in-memory fallback poll when the database is unavailable.",
    responses(
        (status = 200, description = "Current poll", body = PollResponse),
    )
)]
pub async fn get_poll(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.poll_service.get_poll().await;
    (StatusCode::OK, Json(PollResponse::from(view.snapshot)))
}

/// `POST /api/vote` — Add one vote to an option.
///
/// # Errors
///
/// Returns [`PollError`] if `option` is missing or invalid, no poll exists,
/// or the database write fails.
#[utoipa::path(
    post,
    path = "/api/vote",
    tag = "Polls",
    summary = "Submit a vote",
    description = "Increments the tally of the given option by one and returns the updated tallies.",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote counted", body = VoteResponse),
        (status = 400, description = "Missing or invalid option", body = ErrorResponse),
        (status = 404, description = "No active poll", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
    )
)]
pub async fn submit_vote(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, PollError> {
    let option = VoteRequest::from_body(&body).into_option()?;
    let receipt = state.poll_service.submit_vote(option.as_deref()).await?;
    Ok(Json(VoteResponse::accepted(receipt.current_votes)))
}

/// Poll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/polls", get(get_poll))
        .route("/vote", post(submit_vote))
}
