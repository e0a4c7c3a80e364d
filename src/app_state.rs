//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::FallbackPoll;
use crate::persistence::PollGateway;
use crate::service::PollService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Poll service for all business logic.
    pub poll_service: Arc<PollService>,
}

impl AppState {
    /// Wires a service over `gateway` with a fresh fallback snapshot.
    #[must_use]
    pub fn new(gateway: Arc<dyn PollGateway>) -> Self {
        let fallback = Arc::new(FallbackPoll::default());
        Self {
            poll_service: Arc::new(PollService::new(gateway, fallback)),
        }
    }
}
