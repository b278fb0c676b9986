//! One-way digest of a submitted KBA answer set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Blake2b-256 digest of a session's submitted answers.
///
/// Raw answers never reach durable storage; this digest is what the consent
/// record keeps for the audit trail. It proves a specific submission was made
/// without revealing which options were picked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerDigest([u8; 32]);

impl AnswerDigest {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AnswerDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AnswerDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerDigest({})", self.to_hex())
    }
}
