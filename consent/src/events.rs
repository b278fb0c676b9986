//! Events emitted by the orchestrator for the platform to process.

use crate::outcomes::RenewalReminder;
use custodia_types::{ConsentRecordId, Timestamp, UserId};

/// A side effect the platform must deliver or act on. The orchestrator only
/// records these; draining and delivery belong to the embedding layer.
#[derive(Clone, Debug)]
pub enum ConsentEvent {
    /// Consent became active; the child's account may unlock full privileges.
    ConsentGranted {
        record_id: ConsentRecordId,
        child: UserId,
        expires_at: Timestamp,
    },
    /// Consent was withdrawn; the account must drop to restricted mode.
    ConsentRevoked {
        record_id: ConsentRecordId,
        child: UserId,
        reason: Option<String>,
    },
    /// An email-confirmation token was minted; the platform mails the link.
    EmailTokenIssued {
        child: UserId,
        parent_email: String,
        token: String,
        expires_at: Timestamp,
    },
    /// An active consent is inside the renewal window.
    RenewalDue(RenewalReminder),
}
