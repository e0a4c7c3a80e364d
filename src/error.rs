//! Error types for the store and the HTTP surface.
//!
//! [`StoreError`] is produced by the persistence layer and classifies
//! database failures. [`PollError`] is what the service returns to
//! handlers; each variant maps to an HTTP status and a `{ "error": ... }`
//! JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error body returned by every failing endpoint.
///
/// ```json
/// { "error": "Invalid option selected" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Failure reported by the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (refused, timed out, pool closed).
    #[error("database connection error: {0}")]
    Connection(String),

    /// No poll row exists.
    #[error("no poll found")]
    NotFound,

    /// The option is not part of the poll being voted on.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Any other database failure.
    #[error("{0}")]
    Unexpected(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(err.to_string()),
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Unexpected(other.to_string()),
        }
    }
}

/// Service-level error with HTTP status mapping.
///
/// | Variant         | HTTP Status               |
/// |-----------------|---------------------------|
/// | `MissingField`  | 400 Bad Request           |
/// | `InvalidOption` | 400 Bad Request           |
/// | `PollNotFound`  | 404 Not Found             |
/// | `Store`         | 500 Internal Server Error |
/// | `InvalidPoll`   | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// A required request field was absent.
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    /// The submitted option is not one of the poll's options.
    #[error("Invalid option selected")]
    InvalidOption(String),

    /// The store is reachable but holds no poll.
    #[error("No active poll found")]
    PollNotFound,

    /// A store failure during a vote that could not be completed.
    #[error("Database error: {0}")]
    Store(String),

    /// A poll definition violated the option invariants.
    #[error("invalid poll definition: {0}")]
    InvalidPoll(String),
}

impl PollError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidOption(_) => StatusCode::BAD_REQUEST,
            Self::PollNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::InvalidPoll(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for PollError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::PollNotFound,
            StoreError::InvalidOption(option) => Self::InvalidOption(option),
            StoreError::Connection(detail) | StoreError::Unexpected(detail) => {
                Self::Store(detail)
            }
        }
    }
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
