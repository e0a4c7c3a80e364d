//! Domain layer: poll definitions, tallies, and the fallback snapshot.
//!
//! Nothing in here touches the database. The persistence layer produces
//! [`CurrentPoll`] values and the service falls back to [`FallbackPoll`]
//! when the store cannot be reached.

pub mod fallback;
pub mod poll;
pub mod poll_id;

pub use fallback::FallbackPoll;
pub use poll::{CurrentPoll, PollDefinition, PollSnapshot, Tallies, VoteCount};
pub use poll_id::PollId;
