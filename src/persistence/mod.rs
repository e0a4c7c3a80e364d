//! Persistence layer: PostgreSQL-backed poll and tally storage.
//!
//! The service talks to storage only through the [`PollGateway`] trait.
//! [`postgres::PgPollGateway`] is the production implementation on top of
//! `sqlx::PgPool`.

pub mod models;
pub mod postgres;

#[cfg(test)]
pub(crate) mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{CurrentPoll, PollId, Tallies};
use crate::error::StoreError;

pub use postgres::PgPollGateway;

/// Read and update operations against the persisted poll.
///
/// Every method reports an unreachable store as
/// [`StoreError::Connection`] so callers can decide whether to fall back.
#[async_trait]
pub trait PollGateway: Send + Sync + fmt::Debug {
    /// Opens (and releases) a connection to prove the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if no connection could be
    /// established within the configured timeout.
    async fn connect(&self) -> Result<(), StoreError>;

    /// Creates the schema if needed and seeds the default poll when the
    /// store holds none. Returns `true` if a poll was seeded.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store is unreachable or any statement
    /// fails; in that case nothing is committed.
    async fn bootstrap(&self) -> Result<bool, StoreError>;

    /// Loads the most recently created poll and its tallies.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no poll exists.
    async fn fetch_current_poll(&self) -> Result<CurrentPoll, StoreError>;

    /// Returns the id of the most recently created poll.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no poll exists.
    async fn current_poll_id(&self) -> Result<PollId, StoreError>;

    /// Adds exactly one vote to `option` of poll `poll_id` and returns the
    /// poll's updated tallies. Runs as a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidOption`] if `option` is not one of the
    /// poll's options, [`StoreError::NotFound`] if the poll does not exist,
    /// or another [`StoreError`] on database failure. Tallies are unchanged
    /// whenever an error is returned.
    async fn increment_vote(&self, poll_id: PollId, option: &str) -> Result<Tallies, StoreError>;
}
