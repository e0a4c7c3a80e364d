//! In-process poll used while PostgreSQL is unreachable.
//!
//! [`FallbackPoll`] holds a single [`PollSnapshot`] behind a
//! [`tokio::sync::Mutex`]. It is owned by the application state and handed
//! to the service, never reached through a global. Votes recorded here are
//! lost on restart and are never copied into the store.

use tokio::sync::Mutex;

use super::poll::{PollDefinition, PollSnapshot, Tallies};
use crate::error::PollError;

/// Mutex-guarded fallback poll and tallies.
///
/// # Concurrency
///
/// Every vote takes the lock for the validate-and-increment step, so
/// concurrent votes for the same option are never lost.
#[derive(Debug)]
pub struct FallbackPoll {
    definition: PollDefinition,
    tallies: Mutex<Tallies>,
}

impl FallbackPoll {
    /// Creates a fallback snapshot for `definition` with all counters at zero.
    #[must_use]
    pub fn new(definition: PollDefinition) -> Self {
        let tallies = Tallies::zeroed(definition.options());
        Self {
            definition,
            tallies: Mutex::new(tallies),
        }
    }

    /// Copies out the current question, options, and votes.
    pub async fn snapshot(&self) -> PollSnapshot {
        let tallies = self.tallies.lock().await;
        PollSnapshot {
            question: self.definition.question().to_string(),
            options: self.definition.options().to_vec(),
            votes: tallies.clone(),
        }
    }

    /// Records one vote for `option` and returns the updated tallies.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::InvalidOption`] if `option` is not one of the
    /// fallback poll's options; the tallies are left untouched.
    pub async fn record_vote(&self, option: &str) -> Result<Tallies, PollError> {
        if !self.definition.contains(option) {
            return Err(PollError::InvalidOption(option.to_string()));
        }
        let mut tallies = self.tallies.lock().await;
        tallies
            .increment(option)
            .ok_or_else(|| PollError::InvalidOption(option.to_string()))?;
        Ok(tallies.clone())
    }
}

impl Default for FallbackPoll {
    fn default() -> Self {
        Self::new(PollDefinition::default())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn starts_with_default_poll_at_zero() {
        let fallback = FallbackPoll::default();
        let snapshot = fallback.snapshot().await;
        assert_eq!(snapshot.question, "Favorite Cloud Provider?");
        assert_eq!(snapshot.options.len(), 4);
        assert_eq!(snapshot.votes.total(), 0);
        assert!(snapshot.votes.covers_exactly(&snapshot.options));
    }

    #[tokio::test]
    async fn record_vote_increments_only_that_option() {
        let fallback = FallbackPoll::default();
        for _ in 0..3 {
            let Ok(_) = fallback.record_vote("GCP").await else {
                panic!("GCP is a valid option");
            };
        }
        let snapshot = fallback.snapshot().await;
        assert_eq!(snapshot.votes.get("GCP"), Some(3));
        assert_eq!(snapshot.votes.get("AWS"), Some(0));
    }

    #[tokio::test]
    async fn invalid_option_leaves_tallies_unchanged() {
        let fallback = FallbackPoll::default();
        let result = fallback.record_vote("NotAnOption").await;
        assert!(matches!(result, Err(PollError::InvalidOption(_))));
        assert_eq!(fallback.snapshot().await.votes.total(), 0);
    }

    #[tokio::test]
    async fn concurrent_votes_are_not_lost() {
        let fallback = Arc::new(FallbackPoll::default());
        let mut handles = Vec::with_capacity(50);
        for _ in 0..50 {
            let fallback = Arc::clone(&fallback);
            handles.push(tokio::spawn(
                async move { fallback.record_vote("AWS").await },
            ));
        }
        for handle in handles {
            let Ok(Ok(_)) = handle.await else {
                panic!("vote task failed");
            };
        }
        assert_eq!(fallback.snapshot().await.votes.get("AWS"), Some(50));
    }
}
