//! Ephemeral quiz session state and result types.

use crate::question::{PublicQuestion, QuestionId};
use custodia_types::{Language, SessionToken, Timestamp};
use serde::{Deserialize, Serialize};

/// The per-question answer key a session needs for scoring.
///
/// Only the id and the correct index are kept; prompts were already served at
/// generation and are never re-served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQuestion {
    pub id: QuestionId,
    pub correct_option: u32,
}

/// One ephemeral quiz session.
///
/// Lives only in a [`crate::SessionStore`]; holds answer-bearing content, so
/// it is destroyed on pass, expiry, or attempt exhaustion and never persisted.
/// The only mutation after creation is the attempt counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KbaSession {
    pub token: SessionToken,
    pub language: Language,
    /// Ordered answer key; ids unique within the session.
    pub questions: Vec<SessionQuestion>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub attempts: u32,
}

impl KbaSession {
    pub fn has_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// What `generate_session` hands back to the caller: the token and the
/// answer-free questions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionChallenge {
    pub token: SessionToken,
    pub questions: Vec<PublicQuestion>,
    pub expires_at: Timestamp,
}

/// Outcome of scoring one submission. Not an error even on a failing score;
/// callers decide what a failure means.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub passed: bool,
    /// Score as a whole percent, 0..=100.
    pub score_pct: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub pass_threshold_pct: u32,
    pub token: SessionToken,
    pub completed_at: Timestamp,
}

/// Read-only view of a session's standing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Present, unexpired, and attempts remaining.
    pub valid: bool,
    pub expires_at: Option<Timestamp>,
    pub attempts: Option<u32>,
    pub max_attempts: u32,
}
