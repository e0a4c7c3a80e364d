//! Poll and vote DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PollSnapshot, Tallies, VoteCount};
use crate::error::PollError;

/// Response body for `GET /api/polls`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PollResponse {
    /// The poll question.
    pub question: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Vote counts keyed by option.
    pub votes: BTreeMap<String, VoteCount>,
}

impl From<PollSnapshot> for PollResponse {
    fn from(snapshot: PollSnapshot) -> Self {
        Self {
            question: snapshot.question,
            options: snapshot.options,
            votes: snapshot.votes.into_map(),
        }
    }
}

/// Request body for `POST /api/vote`.
///
/// `option` is kept as raw JSON so that a non-string value is reported as
/// an invalid option rather than a malformed body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// The option being voted for.
    #[schema(value_type = String, example = "AWS")]
    #[serde(default)]
    pub option: Option<serde_json::Value>,
}

impl VoteRequest {
    /// Parses a raw request body. Anything that is not a JSON object yields
    /// an empty request, which the service reports as a missing field.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Extracts the submitted option.
    ///
    /// `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::InvalidOption`] if `option` is present but not
    /// a string.
    pub fn into_option(self) -> Result<Option<String>, PollError> {
        match self.option {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(option)) => Ok(Some(option)),
            Some(other) => Err(PollError::InvalidOption(other.to_string())),
        }
    }
}

/// Response body for a successful `POST /api/vote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    /// Confirmation message.
    pub message: String,
    /// Tallies after the vote was counted.
    pub current_votes: BTreeMap<String, VoteCount>,
}

impl VoteResponse {
    /// Builds the confirmation for a counted vote.
    #[must_use]
    pub fn accepted(current_votes: Tallies) -> Self {
        Self {
            message: crate::service::poll_service::VOTE_ACCEPTED_MESSAGE.to_string(),
            current_votes: current_votes.into_map(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_option_is_extracted() {
        let req = VoteRequest::from_body(br#"{"option": "AWS"}"#);
        assert_eq!(req.into_option().ok().flatten().as_deref(), Some("AWS"));
    }

    #[test]
    fn missing_or_null_option_is_absent() {
        let bodies: [&[u8]; 5] = [b"{}", br#"{"option": null}"#, b"", b"not json", b"[1,2]"];
        for body in bodies {
            let req = VoteRequest::from_body(body);
            assert!(matches!(req.into_option(), Ok(None)));
        }
    }

    #[test]
    fn non_string_option_is_invalid() {
        let req = VoteRequest::from_body(br#"{"option": 42}"#);
        assert!(matches!(req.into_option(), Err(PollError::InvalidOption(_))));
    }

    #[test]
    fn vote_response_carries_message() {
        let resp = VoteResponse::accepted(Tallies::default());
        assert_eq!(resp.message, "Vote submitted successfully!");
    }
}
