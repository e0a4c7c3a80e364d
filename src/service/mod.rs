//! Service layer: business logic orchestration.
//!
//! [`PollService`] coordinates poll reads and votes against the
//! [`crate::persistence::PollGateway`] and falls back to the in-process
//! [`crate::domain::FallbackPoll`] when the store is unreachable.

pub mod poll_service;

pub use poll_service::{DataSource, HealthStatus, PollService, PollView, VoteReceipt};
