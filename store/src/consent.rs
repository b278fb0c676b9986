//! Durable consent records and their storage trait.

use crate::StoreError;
use custodia_types::{
    AnswerDigest, ConsentRecordId, ConsentScope, Timestamp, UserId, VerificationMethod,
};
use serde::{Deserialize, Serialize};

/// Where the consent request came from, kept for the audit trail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Method-specific proof attached to a record once verification ran.
///
/// KBA evidence holds only the one-way digest of the submitted answers;
/// cleartext answers never reach durable storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationEvidence {
    /// No verification attempt recorded yet.
    None,
    Kba {
        answer_digest: AnswerDigest,
        score_pct: u32,
        submitted_from_ip: Option<String>,
    },
    Payment {
        reference: String,
        verified: bool,
    },
}

/// Lifecycle position of a record. `Expired` is derived from `expires_at`,
/// never stored as a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentStatus {
    Pending,
    Granted,
    Revoked,
    Expired,
}

/// A durable parental-consent record for one child and one request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub id: ConsentRecordId,
    pub child: UserId,
    pub parent_email: String,
    pub parent_name: Option<String>,
    pub method: VerificationMethod,
    pub scope: ConsentScope,
    pub granted: bool,
    pub consent_date: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
    pub revoked_reason: Option<String>,
    pub evidence: VerificationEvidence,
    pub requester: RequesterInfo,
    pub created_at: Timestamp,
}

impl ConsentRecord {
    /// A fresh pending record, as created at initiation.
    pub fn pending(
        id: ConsentRecordId,
        child: UserId,
        parent_email: String,
        parent_name: Option<String>,
        method: VerificationMethod,
        scope: ConsentScope,
        requester: RequesterInfo,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            child,
            parent_email,
            parent_name,
            method,
            scope,
            granted: false,
            consent_date: None,
            expires_at: None,
            revoked_at: None,
            revoked_reason: None,
            evidence: VerificationEvidence::None,
            requester,
            created_at,
        }
    }

    /// Granted, unrevoked, and unexpired at `now`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.granted
            && self.revoked_at.is_none()
            && self.expires_at.is_some_and(|exp| exp > now)
    }

    pub fn status(&self, now: Timestamp) -> ConsentStatus {
        if !self.granted {
            ConsentStatus::Pending
        } else if self.revoked_at.is_some() {
            ConsentStatus::Revoked
        } else if self.expires_at.is_some_and(|exp| exp <= now) {
            ConsentStatus::Expired
        } else {
            ConsentStatus::Granted
        }
    }
}

/// The atomic grant: record fields and profile fields changed together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTransaction {
    pub record_id: ConsentRecordId,
    pub child: UserId,
    pub consent_date: Timestamp,
    pub expires_at: Timestamp,
}

/// The atomic revocation: record fields and profile fields changed together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationTransaction {
    pub record_id: ConsentRecordId,
    pub child: UserId,
    pub revoked_at: Timestamp,
    pub reason: Option<String>,
}

/// Which inactive records the retention sweep may delete.
///
/// The policy lives here so every backend deletes the same set: records never
/// granted and created before the cutoff, and revoked records whose
/// revocation predates the cutoff. Granted-and-active records never match.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RetentionFilter {
    pub cutoff: Timestamp,
}

impl RetentionFilter {
    pub fn matches(&self, record: &ConsentRecord) -> bool {
        if !record.granted {
            return record.created_at < self.cutoff;
        }
        match record.revoked_at {
            Some(revoked_at) => revoked_at < self.cutoff,
            None => false,
        }
    }
}

/// Durable consent-record storage.
///
/// `apply_grant` and `apply_revocation` must each run as one atomic
/// multi-statement transaction covering the record *and* the child's profile.
pub trait ConsentStore: Send + Sync {
    fn create_consent_record(&self, record: &ConsentRecord) -> Result<(), StoreError>;

    fn get_consent_record(
        &self,
        id: &ConsentRecordId,
    ) -> Result<Option<ConsentRecord>, StoreError>;

    /// The child's active record (granted, unrevoked, unexpired), if any.
    fn find_active_consent(
        &self,
        child: &UserId,
        now: Timestamp,
    ) -> Result<Option<ConsentRecord>, StoreError>;

    /// Replace the verification evidence on a record.
    fn record_evidence(
        &self,
        id: &ConsentRecordId,
        evidence: VerificationEvidence,
    ) -> Result<(), StoreError>;

    /// All records for a child, newest first.
    fn consent_history(&self, child: &UserId) -> Result<Vec<ConsentRecord>, StoreError>;

    /// Active records whose expiry falls within `now + within_secs`.
    fn find_expiring(
        &self,
        now: Timestamp,
        within_secs: u64,
    ) -> Result<Vec<ConsentRecord>, StoreError>;

    /// Atomically mark the record granted and flip the profile to
    /// GRANTED / coppa-compliant. Both writes succeed or both fail.
    fn apply_grant(&self, grant: &GrantTransaction) -> Result<(), StoreError>;

    /// Atomically mark the record revoked and flip the profile to
    /// DENIED / non-compliant. Both writes succeed or both fail.
    fn apply_revocation(&self, revocation: &RevocationTransaction) -> Result<(), StoreError>;

    /// Delete every record matching the retention filter, returning the count.
    fn delete_consent_records(&self, filter: &RetentionFilter) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ConsentRecord {
        ConsentRecord::pending(
            ConsentRecordId::new(id),
            UserId::new("child-1"),
            "parent@example.com".into(),
            None,
            VerificationMethod::Kba,
            ["messaging"].into_iter().collect(),
            RequesterInfo::default(),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn pending_record_is_not_active() {
        let rec = record("r1");
        assert!(!rec.is_active(Timestamp::new(2_000)));
        assert_eq!(rec.status(Timestamp::new(2_000)), ConsentStatus::Pending);
    }

    #[test]
    fn granted_record_expires_by_clock_not_by_transition() {
        let mut rec = record("r1");
        rec.granted = true;
        rec.consent_date = Some(Timestamp::new(2_000));
        rec.expires_at = Some(Timestamp::new(10_000));

        assert!(rec.is_active(Timestamp::new(5_000)));
        assert_eq!(rec.status(Timestamp::new(5_000)), ConsentStatus::Granted);

        assert!(!rec.is_active(Timestamp::new(10_000)));
        assert_eq!(rec.status(Timestamp::new(10_000)), ConsentStatus::Expired);
    }

    #[test]
    fn revocation_wins_over_expiry() {
        let mut rec = record("r1");
        rec.granted = true;
        rec.consent_date = Some(Timestamp::new(2_000));
        rec.expires_at = Some(Timestamp::new(10_000));
        rec.revoked_at = Some(Timestamp::new(3_000));

        assert!(!rec.is_active(Timestamp::new(5_000)));
        assert_eq!(rec.status(Timestamp::new(20_000)), ConsentStatus::Revoked);
    }

    #[test]
    fn retention_filter_spares_granted_active_records() {
        let cutoff = RetentionFilter {
            cutoff: Timestamp::new(100_000),
        };

        let mut granted = record("granted");
        granted.granted = true;
        granted.consent_date = Some(Timestamp::new(2_000));
        granted.expires_at = Some(Timestamp::new(50_000));
        assert!(!cutoff.matches(&granted), "granted records are kept");

        let stale_pending = record("stale");
        assert!(cutoff.matches(&stale_pending), "old never-granted records go");

        let mut old_revoked = granted.clone();
        old_revoked.revoked_at = Some(Timestamp::new(90_000));
        assert!(cutoff.matches(&old_revoked), "old revocations go");

        let mut fresh_revoked = granted.clone();
        fresh_revoked.revoked_at = Some(Timestamp::new(200_000));
        assert!(!cutoff.matches(&fresh_revoked), "recent revocations stay");
    }
}
