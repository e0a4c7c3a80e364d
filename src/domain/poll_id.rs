//! Type-safe poll identifier.
//!
//! [`PollId`] wraps the `SERIAL` primary key of the `polls` table so it
//! cannot be confused with other integer columns such as vote counts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a persisted poll row.
///
/// Assigned by PostgreSQL on insert. The fallback snapshot has no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(i32);

impl PollId {
    /// Wraps a raw database id.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw database id, for binding into queries.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PollId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}
