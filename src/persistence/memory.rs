//! In-memory [`PollGateway`] used by service and router tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::PollGateway;
use crate::domain::{CurrentPoll, PollDefinition, PollId, PollSnapshot, Tallies};
use crate::error::StoreError;

#[derive(Debug)]
struct StoredState {
    id: PollId,
    definition: PollDefinition,
    tallies: Tallies,
}

/// Gateway that keeps one poll in memory and can simulate an unreachable
/// store or a failing write.
#[derive(Debug, Default)]
pub(crate) struct MemoryGateway {
    state: Mutex<Option<StoredState>>,
    unreachable: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryGateway {
    /// An empty store that needs [`PollGateway::bootstrap`].
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// A store that already holds the default poll with zero votes.
    pub(crate) async fn seeded() -> Self {
        let gateway = Self::default();
        let _ = gateway.bootstrap().await;
        gateway
    }

    /// A store whose every connection attempt fails.
    pub(crate) fn unreachable() -> Self {
        let gateway = Self::default();
        gateway.set_unreachable(true);
        gateway
    }

    pub(crate) fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_writes(&self, value: bool) {
        self.fail_writes.store(value, Ordering::SeqCst);
    }

    pub(crate) async fn tallies(&self) -> Option<Tallies> {
        self.state.lock().await.as_ref().map(|s| s.tallies.clone())
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PollGateway for MemoryGateway {
    async fn connect(&self) -> Result<(), StoreError> {
        self.check_reachable()
    }

    async fn bootstrap(&self) -> Result<bool, StoreError> {
        self.check_reachable()?;
        let mut state = self.state.lock().await;
        if state.is_some() {
            return Ok(false);
        }
        let definition = PollDefinition::default();
        let tallies = Tallies::zeroed(definition.options());
        *state = Some(StoredState {
            id: PollId::new(1),
            definition,
            tallies,
        });
        Ok(true)
    }

    async fn fetch_current_poll(&self) -> Result<CurrentPoll, StoreError> {
        self.check_reachable()?;
        let state = self.state.lock().await;
        let stored = state.as_ref().ok_or(StoreError::NotFound)?;
        Ok(CurrentPoll {
            id: stored.id,
            snapshot: PollSnapshot {
                question: stored.definition.question().to_string(),
                options: stored.definition.options().to_vec(),
                votes: stored.tallies.clone(),
            },
        })
    }

    async fn current_poll_id(&self) -> Result<PollId, StoreError> {
        self.check_reachable()?;
        let state = self.state.lock().await;
        state.as_ref().map(|s| s.id).ok_or(StoreError::NotFound)
    }

    async fn increment_vote(&self, poll_id: PollId, option: &str) -> Result<Tallies, StoreError> {
        self.check_reachable()?;
        let mut state = self.state.lock().await;
        let stored = state
            .as_mut()
            .filter(|s| s.id == poll_id)
            .ok_or(StoreError::NotFound)?;
        if !stored.definition.contains(option) {
            return Err(StoreError::InvalidOption(option.to_string()));
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unexpected("deadlock detected".to_string()));
        }
        let mut updated = stored.tallies.clone();
        updated
            .increment(option)
            .ok_or_else(|| StoreError::Unexpected(format!("no tally row for {option}")))?;
        stored.tallies = updated.clone();
        Ok(updated)
    }
}
