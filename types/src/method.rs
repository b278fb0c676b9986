//! Parental verification methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a parent proves they are an adult authorizing the consent.
///
/// The orchestrator branches on this at initiation; the record keeps it for
/// the audit trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// Knowledge-based authentication: a timed quiz of adult-knowledge questions.
    Kba,
    /// A confirmation link mailed to the parent, redeemed out of band.
    Email,
    /// A payment-card charge verified by the payment gateway.
    Payment,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kba => "kba",
            Self::Email => "email",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
