//! Nullable store: thread-safe in-memory users and consent records.

use custodia_store::{
    ConsentRecord, ConsentStore, EmailToken, GrantTransaction, ParentalConsentStatus,
    RetentionFilter, RevocationTransaction, StoreError, UserRecord, UserStore,
    VerificationEvidence,
};
use custodia_types::{ConsentRecordId, Timestamp, UserId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    consents: HashMap<String, ConsentRecord>,
}

/// An in-memory user + consent store for testing.
///
/// One mutex guards both tables, so `apply_grant` and `apply_revocation` are
/// genuinely atomic across the record and the profile, matching what a real
/// backend provides with a transaction.
pub struct NullStore {
    inner: Mutex<Inner>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Seed a user, replacing any previous record with the same id.
    pub fn put_user(&self, user: UserRecord) {
        self.lock_inner().users.insert(user.id.to_string(), user);
    }

    pub fn user_count(&self) -> usize {
        self.lock_inner().users.len()
    }

    pub fn consent_count(&self) -> usize {
        self.lock_inner().consents.len()
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("null store mutex poisoned")
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for NullStore {
    fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock_inner().users.get(id.as_str()).cloned())
    }

    fn set_email_token(&self, id: &UserId, token: EmailToken) -> Result<(), StoreError> {
        let mut inner = self.lock_inner();
        let user = inner
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.profile.email_token = Some(token);
        Ok(())
    }
}

impl ConsentStore for NullStore {
    fn create_consent_record(&self, record: &ConsentRecord) -> Result<(), StoreError> {
        let mut inner = self.lock_inner();
        let key = record.id.to_string();
        if inner.consents.contains_key(&key) {
            return Err(StoreError::Duplicate(key));
        }
        inner.consents.insert(key, record.clone());
        Ok(())
    }

    fn get_consent_record(
        &self,
        id: &ConsentRecordId,
    ) -> Result<Option<ConsentRecord>, StoreError> {
        Ok(self.lock_inner().consents.get(id.as_str()).cloned())
    }

    fn find_active_consent(
        &self,
        child: &UserId,
        now: Timestamp,
    ) -> Result<Option<ConsentRecord>, StoreError> {
        Ok(self
            .lock_inner()
            .consents
            .values()
            .find(|r| r.child == *child && r.is_active(now))
            .cloned())
    }

    fn record_evidence(
        &self,
        id: &ConsentRecordId,
        evidence: VerificationEvidence,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner();
        let record = inner
            .consents
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.evidence = evidence;
        Ok(())
    }

    fn consent_history(&self, child: &UserId) -> Result<Vec<ConsentRecord>, StoreError> {
        let mut records: Vec<ConsentRecord> = self
            .lock_inner()
            .consents
            .values()
            .filter(|r| r.child == *child)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn find_expiring(
        &self,
        now: Timestamp,
        within_secs: u64,
    ) -> Result<Vec<ConsentRecord>, StoreError> {
        let horizon = now.plus_secs(within_secs);
        Ok(self
            .lock_inner()
            .consents
            .values()
            .filter(|r| {
                r.is_active(now) && r.expires_at.is_some_and(|exp| exp <= horizon)
            })
            .cloned()
            .collect())
    }

    fn apply_grant(&self, grant: &GrantTransaction) -> Result<(), StoreError> {
        let mut inner = self.lock_inner();

        // Both lookups happen before either write, so the transaction fails
        // whole when one side is missing.
        if !inner.consents.contains_key(grant.record_id.as_str()) {
            return Err(StoreError::NotFound(grant.record_id.to_string()));
        }
        if !inner.users.contains_key(grant.child.as_str()) {
            return Err(StoreError::NotFound(grant.child.to_string()));
        }

        let record = inner
            .consents
            .get_mut(grant.record_id.as_str())
            .expect("checked above");
        record.granted = true;
        record.consent_date = Some(grant.consent_date);
        record.expires_at = Some(grant.expires_at);

        let user = inner
            .users
            .get_mut(grant.child.as_str())
            .expect("checked above");
        user.profile.parental_consent_status = ParentalConsentStatus::Granted;
        user.profile.parental_consent_date = Some(grant.consent_date);
        user.profile.coppa_compliant = true;

        Ok(())
    }

    fn apply_revocation(&self, revocation: &RevocationTransaction) -> Result<(), StoreError> {
        let mut inner = self.lock_inner();

        if !inner.consents.contains_key(revocation.record_id.as_str()) {
            return Err(StoreError::NotFound(revocation.record_id.to_string()));
        }
        if !inner.users.contains_key(revocation.child.as_str()) {
            return Err(StoreError::NotFound(revocation.child.to_string()));
        }

        let record = inner
            .consents
            .get_mut(revocation.record_id.as_str())
            .expect("checked above");
        record.revoked_at = Some(revocation.revoked_at);
        record.revoked_reason = revocation.reason.clone();

        let user = inner
            .users
            .get_mut(revocation.child.as_str())
            .expect("checked above");
        user.profile.parental_consent_status = ParentalConsentStatus::Denied;
        user.profile.coppa_compliant = false;

        Ok(())
    }

    fn delete_consent_records(&self, filter: &RetentionFilter) -> Result<usize, StoreError> {
        let mut inner = self.lock_inner();
        let before = inner.consents.len();
        inner.consents.retain(|_, record| !filter.matches(record));
        Ok(before - inner.consents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custodia_store::{Profile, RequesterInfo};
    use custodia_types::{ConsentScope, Language, VerificationMethod};

    fn child() -> UserId {
        UserId::new("child-1")
    }

    fn seeded_store() -> NullStore {
        let store = NullStore::new();
        store.put_user(UserRecord {
            id: child(),
            profile: Profile::minor(Language::En),
        });
        store
    }

    fn pending_record(id: &str, created_at: u64) -> ConsentRecord {
        ConsentRecord::pending(
            ConsentRecordId::new(id),
            child(),
            "parent@example.com".into(),
            None,
            VerificationMethod::Kba,
            ConsentScope::new(),
            RequesterInfo::default(),
            Timestamp::new(created_at),
        )
    }

    #[test]
    fn create_rejects_duplicate_ids() {
        let store = seeded_store();
        store.create_consent_record(&pending_record("r1", 10)).unwrap();
        assert!(matches!(
            store.create_consent_record(&pending_record("r1", 20)),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn grant_updates_record_and_profile_together() {
        let store = seeded_store();
        store.create_consent_record(&pending_record("r1", 10)).unwrap();

        store
            .apply_grant(&GrantTransaction {
                record_id: ConsentRecordId::new("r1"),
                child: child(),
                consent_date: Timestamp::new(100),
                expires_at: Timestamp::new(1_000),
            })
            .unwrap();

        let record = store
            .get_consent_record(&ConsentRecordId::new("r1"))
            .unwrap()
            .unwrap();
        assert!(record.granted);
        assert_eq!(record.consent_date, Some(Timestamp::new(100)));

        let profile = store.find_user(&child()).unwrap().unwrap().profile;
        assert_eq!(
            profile.parental_consent_status,
            ParentalConsentStatus::Granted
        );
        assert!(profile.coppa_compliant);
    }

    #[test]
    fn grant_for_unknown_child_changes_nothing() {
        let store = NullStore::new(); // no users seeded
        store.create_consent_record(&pending_record("r1", 10)).unwrap();

        let result = store.apply_grant(&GrantTransaction {
            record_id: ConsentRecordId::new("r1"),
            child: child(),
            consent_date: Timestamp::new(100),
            expires_at: Timestamp::new(1_000),
        });
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        // The record side of the failed transaction did not land either.
        let record = store
            .get_consent_record(&ConsentRecordId::new("r1"))
            .unwrap()
            .unwrap();
        assert!(!record.granted);
        assert_eq!(record.consent_date, None);
    }

    #[test]
    fn revocation_for_unknown_record_changes_nothing() {
        let store = seeded_store();

        let result = store.apply_revocation(&RevocationTransaction {
            record_id: ConsentRecordId::new("missing"),
            child: child(),
            revoked_at: Timestamp::new(100),
            reason: None,
        });
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        let profile = store.find_user(&child()).unwrap().unwrap().profile;
        assert_eq!(
            profile.parental_consent_status,
            ParentalConsentStatus::Pending
        );
    }

    #[test]
    fn find_active_skips_pending_revoked_and_expired() {
        let store = seeded_store();
        let now = Timestamp::new(500);

        store.create_consent_record(&pending_record("pending", 10)).unwrap();
        assert!(store.find_active_consent(&child(), now).unwrap().is_none());

        let mut granted = pending_record("granted", 20);
        granted.granted = true;
        granted.consent_date = Some(Timestamp::new(50));
        granted.expires_at = Some(Timestamp::new(1_000));
        store.create_consent_record(&granted).unwrap();

        let active = store.find_active_consent(&child(), now).unwrap().unwrap();
        assert_eq!(active.id.as_str(), "granted");

        // Past expiry it no longer counts.
        assert!(store
            .find_active_consent(&child(), Timestamp::new(1_000))
            .unwrap()
            .is_none());
    }

    #[test]
    fn set_email_token_requires_existing_user() {
        let store = NullStore::new();
        let result = store.set_email_token(
            &child(),
            EmailToken {
                token: "tok".into(),
                expires_at: Timestamp::new(10),
                parent_email: "p@example.com".into(),
                parent_name: None,
            },
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
