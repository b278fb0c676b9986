//! Result payloads returned by orchestrator operations.

use custodia_kba::SessionChallenge;
use custodia_store::ConsentRecord;
use custodia_types::{ConsentRecordId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// What initiation hands back: the record id, plus the quiz challenge when
/// the method is KBA.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Initiation {
    pub record_id: ConsentRecordId,
    pub kba: Option<SessionChallenge>,
}

/// Read-only answer to "may this child exercise full privileges right now?".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentStatusReport {
    pub has_active_consent: bool,
    /// The active record, when one exists.
    pub record: Option<ConsentRecord>,
    /// Whole days until the active consent expires.
    pub days_until_expiry: Option<u64>,
}

/// One renewal notice for an expiring consent. Delivery is external.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenewalReminder {
    pub record_id: ConsentRecordId,
    pub child: UserId,
    pub parent_email: String,
    pub expires_at: Timestamp,
    pub days_until_expiry: u64,
}
