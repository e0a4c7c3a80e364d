//! Poll service: reads, votes, and health checks with in-memory fallback.
//!
//! # Fallback policy
//!
//! Reads never fail: any store error on `get_poll` is logged and the
//! fallback snapshot is served instead. Votes fall back only when the store
//! cannot be reached at all while looking up the current poll. Once a write
//! has been attempted against the store, failures are surfaced as errors
//! rather than silently redirected to the in-memory tally.

use std::sync::Arc;

use crate::domain::{FallbackPoll, PollSnapshot, Tallies};
use crate::error::{PollError, StoreError};
use crate::persistence::PollGateway;

/// Message returned with every accepted vote.
pub const VOTE_ACCEPTED_MESSAGE: &str = "Vote submitted successfully!";

/// Where a result was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The persisted store.
    Store,
    /// The in-process fallback snapshot.
    Fallback,
}

/// Result of [`PollService::get_poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollView {
    /// Question, options, and votes.
    pub snapshot: PollSnapshot,
    /// Whether the store or the fallback answered.
    pub source: DataSource,
}

/// Result of a successful [`PollService::submit_vote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    /// Tallies after the vote was counted.
    pub current_votes: Tallies,
    /// Whether the vote went to the store or the fallback.
    pub source: DataSource,
}

/// Result of [`PollService::health_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    /// `true` if a store connection succeeded just now.
    pub database_connected: bool,
}

/// Orchestrates poll reads and votes over a [`PollGateway`], substituting
/// the [`FallbackPoll`] when the store is unreachable.
#[derive(Debug, Clone)]
pub struct PollService {
    gateway: Arc<dyn PollGateway>,
    fallback: Arc<FallbackPoll>,
}

impl PollService {
    /// Creates a new `PollService`.
    #[must_use]
    pub fn new(gateway: Arc<dyn PollGateway>, fallback: Arc<FallbackPoll>) -> Self {
        Self { gateway, fallback }
    }

    /// Returns a reference to the fallback snapshot.
    #[must_use]
    pub fn fallback(&self) -> &Arc<FallbackPoll> {
        &self.fallback
    }

    /// Prepares the store at startup. Returns `false` if the store could
    /// not be initialized, in which case requests are served from the
    /// fallback until it becomes reachable.
    pub async fn bootstrap(&self) -> bool {
        match self.gateway.bootstrap().await {
            Ok(seeded) => {
                tracing::info!(seeded, "database initialized");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "database initialization failed, using in-memory storage");
                false
            }
        }
    }

    /// Returns the current poll and its tallies.
    ///
    /// Never fails: on any store error the fallback snapshot is returned.
    pub async fn get_poll(&self) -> PollView {
        match self.gateway.fetch_current_poll().await {
            Ok(current) => PollView {
                snapshot: current.snapshot,
                source: DataSource::Store,
            },
            Err(err) => {
                tracing::warn!(error = %err, "fetching poll failed, serving fallback");
                PollView {
                    snapshot: self.fallback.snapshot().await,
                    source: DataSource::Fallback,
                }
            }
        }
    }

    /// Records one vote for `option`.
    ///
    /// # Errors
    ///
    /// - [`PollError::MissingField`] if `option` is `None`.
    /// - [`PollError::InvalidOption`] if `option` is not one of the poll's
    ///   options (in either mode); nothing is changed.
    /// - [`PollError::PollNotFound`] if the store is reachable but empty.
    /// - [`PollError::Store`] if the store fails after it was reached; the
    ///   write is rolled back.
    pub async fn submit_vote(&self, option: Option<&str>) -> Result<VoteReceipt, PollError> {
        let option = option.ok_or(PollError::MissingField("option"))?;

        let poll_id = match self.gateway.current_poll_id().await {
            Ok(id) => id,
            Err(StoreError::Connection(detail)) => {
                tracing::warn!(error = %detail, option, "store unreachable, voting in memory");
                return self.vote_in_fallback(option).await;
            }
            Err(err) => {
                tracing::error!(error = %err, "looking up current poll failed");
                return Err(err.into());
            }
        };

        match self.gateway.increment_vote(poll_id, option).await {
            Ok(current_votes) => {
                tracing::info!(%poll_id, option, total = current_votes.total(), "vote received");
                Ok(VoteReceipt {
                    current_votes,
                    source: DataSource::Store,
                })
            }
            Err(StoreError::InvalidOption(option)) => {
                tracing::debug!(%poll_id, option, "rejected invalid option");
                Err(PollError::InvalidOption(option))
            }
            Err(err) => {
                tracing::error!(%poll_id, option, error = %err, "submitting vote failed");
                Err(err.into())
            }
        }
    }

    /// Attempts a store connection and reports the outcome. Never fails.
    pub async fn health_check(&self) -> HealthStatus {
        let database_connected = match self.gateway.connect().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "health check could not reach database");
                false
            }
        };
        HealthStatus { database_connected }
    }

    async fn vote_in_fallback(&self, option: &str) -> Result<VoteReceipt, PollError> {
        let current_votes = self.fallback.record_vote(option).await?;
        Ok(VoteReceipt {
            current_votes,
            source: DataSource::Fallback,
        })
    }
}
