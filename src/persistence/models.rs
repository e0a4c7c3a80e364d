//! Database row models for polls and vote tallies.

use chrono::{DateTime, Utc};

use crate::domain::{PollId, VoteCount};

/// A row from the `polls` table.
#[derive(Debug, Clone)]
pub struct StoredPoll {
    /// `SERIAL` primary key.
    pub id: PollId,
    /// Poll question.
    pub question: String,
    /// Options in display order, stored as a JSONB array.
    pub options: Vec<String>,
    /// Insertion timestamp; the newest poll is the current one.
    pub created_at: DateTime<Utc>,
}

/// A row from the `votes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTally {
    /// Option text, unique per poll.
    pub option_text: String,
    /// Number of votes recorded for the option.
    pub vote_count: VoteCount,
}
