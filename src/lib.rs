//! # poll-gateway
//!
//! Minimal poll-voting backend. Serves the current poll question, its
//! options, and vote tallies, and accepts votes that increment a tally.
//! State lives in PostgreSQL; when the database cannot be reached the
//! service keeps answering from an in-process fallback poll.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PollService (service/)
//!     │       └── FallbackPoll (domain/)
//!     │
//!     └── PollGateway (persistence/)
//!             └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
