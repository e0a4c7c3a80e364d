//! Poll definitions, per-option tallies, and read-side snapshots.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PollId;
use crate::error::PollError;

/// Question used to seed both the store and the fallback snapshot.
pub const DEFAULT_QUESTION: &str = "Favorite Cloud Provider?";

/// Options of the default poll, in display order.
pub const DEFAULT_OPTIONS: [&str; 4] = ["GCP", "AWS", "Azure", "Other"];

/// Vote counter value. The `votes.vote_count` column is widened to this on read.
pub type VoteCount = i64;

/// A question and its ordered, unique list of options.
///
/// Immutable once built. Construction rejects empty or duplicate options so
/// that a tally set derived from it always has one counter per option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDefinition {
    question: String,
    options: Vec<String>,
}

impl PollDefinition {
    /// Builds a definition after validating the option list.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::InvalidPoll`] if there are no options, an option
    /// is blank, or an option appears twice.
    pub fn new(question: impl Into<String>, options: Vec<String>) -> Result<Self, PollError> {
        if options.is_empty() {
            return Err(PollError::InvalidPoll("poll has no options".to_string()));
        }
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if option.trim().is_empty() {
                return Err(PollError::InvalidPoll("blank option".to_string()));
            }
            if !seen.insert(option.as_str()) {
                return Err(PollError::InvalidPoll(format!("duplicate option: {option}")));
            }
        }
        Ok(Self {
            question: question.into(),
            options,
        })
    }

    /// The poll question.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns `true` if `option` is one of this poll's options.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

impl Default for PollDefinition {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            options: DEFAULT_OPTIONS.iter().map(|o| (*o).to_string()).collect(),
        }
    }
}

/// Per-option vote counts for a single poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tallies(BTreeMap<String, VoteCount>);

impl Tallies {
    /// One zero counter per option.
    #[must_use]
    pub fn zeroed(options: &[String]) -> Self {
        Self(options.iter().map(|o| (o.clone(), 0)).collect())
    }

    /// Adds one vote to `option` and returns the new count, or `None` if
    /// there is no counter for it.
    pub fn increment(&mut self, option: &str) -> Option<VoteCount> {
        let count = self.0.get_mut(option)?;
        *count = count.saturating_add(1);
        Some(*count)
    }

    /// Current count for `option`.
    #[must_use]
    pub fn get(&self, option: &str) -> Option<VoteCount> {
        self.0.get(option).copied()
    }

    /// Returns `true` if the counters are keyed by exactly `options`.
    #[must_use]
    pub fn covers_exactly(&self, options: &[String]) -> bool {
        self.0.len() == options.len() && options.iter().all(|o| self.0.contains_key(o))
    }

    /// Sum of all counters.
    #[must_use]
    pub fn total(&self) -> VoteCount {
        self.0.values().sum()
    }

    /// Consumes the tallies, returning the option → count map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, VoteCount> {
        self.0
    }
}

impl FromIterator<(String, VoteCount)> for Tallies {
    fn from_iter<I: IntoIterator<Item = (String, VoteCount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Question, options, and votes as served by `GET /api/polls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollSnapshot {
    /// The poll question.
    pub question: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Vote counts keyed by option.
    pub votes: Tallies,
}

/// The most recent persisted poll together with its tallies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPoll {
    /// Database id of the poll.
    pub id: PollId,
    /// Question, options, and votes.
    pub snapshot: PollSnapshot,
}
