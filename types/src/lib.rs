//! Fundamental types for the Custodia parental-consent core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identifiers, timestamps, language tags, consent scopes, verification methods,
//! and the tunable consent parameters.

pub mod digest;
pub mod id;
pub mod language;
pub mod method;
pub mod params;
pub mod scope;
pub mod time;

pub use digest::AnswerDigest;
pub use id::{ConsentRecordId, SessionToken, UserId};
pub use language::Language;
pub use method::VerificationMethod;
pub use params::{ConsentParams, ParamsError};
pub use scope::ConsentScope;
pub use time::{Timestamp, DAY_SECS};
