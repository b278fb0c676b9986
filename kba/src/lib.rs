//! Knowledge-based authentication (KBA) for parental verification.
//!
//! Two pieces:
//! 1. **Question bank**: an immutable catalog of bilingual adult-knowledge
//!    questions, with deterministic hash-scored selection.
//! 2. **Session manager**: ephemeral, single-use quiz sessions keyed by
//!    unguessable tokens, with TTL expiry and attempt limits enforced
//!    atomically per session.
//!
//! Sessions hold answer-bearing content, so they live only in the injected
//! [`SessionStore`] and are destroyed on pass, expiry, or attempt exhaustion.
//! Nothing in this crate touches durable storage.

pub mod bank;
pub mod builtin;
pub mod error;
pub mod manager;
pub mod question;
pub mod session;
pub mod store;

pub use bank::QuestionBank;
pub use builtin::builtin_bank;
pub use error::KbaError;
pub use manager::SessionManager;
pub use question::{Difficulty, PublicQuestion, Question, QuestionCategory, QuestionId, QuestionText};
pub use session::{KbaSession, SessionChallenge, SessionStatus, VerifyReport};
pub use store::{AttemptClaim, InMemorySessionStore, SessionStore};
