//! The consent workflow orchestrator.

use crate::error::ConsentError;
use crate::events::ConsentEvent;
use crate::outcomes::{ConsentStatusReport, Initiation, RenewalReminder};
use custodia_kba::SessionManager;
use custodia_store::{
    ConsentRecord, ConsentStore, EmailToken, GrantTransaction, RequesterInfo, RetentionFilter,
    RevocationTransaction, UserRecord, UserStore, VerificationEvidence,
};
use custodia_types::{
    ConsentParams, ConsentRecordId, ConsentScope, SessionToken, Timestamp, UserId,
    VerificationMethod,
};
use custodia_utils::format_duration;
use std::sync::{Arc, Mutex};

/// A request to start the consent process for one child.
#[derive(Clone, Debug)]
pub struct InitiateConsent {
    pub child: UserId,
    pub parent_email: String,
    pub parent_name: Option<String>,
    pub method: VerificationMethod,
    pub scope: ConsentScope,
    pub requester: RequesterInfo,
}

/// Ties the store adapter, the KBA session manager, and the consent policy
/// into the end-to-end consent workflow.
///
/// Every operation re-fetches durable state and takes `now` from the caller;
/// the orchestrator holds no clock and caches nothing across calls.
pub struct ConsentOrchestrator {
    users: Arc<dyn UserStore>,
    consents: Arc<dyn ConsentStore>,
    kba: SessionManager,
    params: ConsentParams,
    /// Pending events for the platform to process.
    pending_events: Mutex<Vec<ConsentEvent>>,
}

impl ConsentOrchestrator {
    pub fn new(
        users: Arc<dyn UserStore>,
        consents: Arc<dyn ConsentStore>,
        kba: SessionManager,
        params: ConsentParams,
    ) -> Self {
        Self {
            users,
            consents,
            kba,
            params,
            pending_events: Mutex::new(Vec::new()),
        }
    }

    /// Start the consent process: eligibility checks, a fresh pending record,
    /// then the method-specific branch.
    pub fn initiate_consent(
        &self,
        request: InitiateConsent,
        now: Timestamp,
    ) -> Result<Initiation, ConsentError> {
        let user = self.fetch_user(&request.child)?;

        if !user.profile.is_minor {
            tracing::debug!(child = %request.child, "initiation rejected: not a minor");
            return Err(ConsentError::NotAMinor(request.child.to_string()));
        }

        if self
            .consents
            .find_active_consent(&request.child, now)?
            .is_some()
        {
            return Err(ConsentError::ConsentAlreadyExists(request.child.to_string()));
        }

        let record = ConsentRecord::pending(
            ConsentRecordId::new(custodia_crypto::random_hex(16)),
            request.child.clone(),
            request.parent_email.clone(),
            request.parent_name.clone(),
            request.method,
            request.scope,
            request.requester,
            now,
        );
        self.consents.create_consent_record(&record)?;

        tracing::info!(
            child = %request.child,
            record = %record.id,
            method = %request.method,
            "consent initiated"
        );

        let kba = match request.method {
            VerificationMethod::Kba => {
                Some(self.kba.generate_session(user.profile.language, now)?)
            }
            VerificationMethod::Email => {
                let token = custodia_crypto::email_token();
                let expires_at = now.plus_secs(self.params.email_token_ttl_secs);
                self.users.set_email_token(
                    &request.child,
                    EmailToken {
                        token: token.clone(),
                        expires_at,
                        parent_email: request.parent_email.clone(),
                        parent_name: request.parent_name,
                    },
                )?;
                self.push_event(ConsentEvent::EmailTokenIssued {
                    child: request.child,
                    parent_email: request.parent_email,
                    token,
                    expires_at,
                });
                None
            }
            // Grant arrives later through verify_payment_consent or an
            // explicit grant call.
            VerificationMethod::Payment => None,
        };

        Ok(Initiation {
            record_id: record.id,
            kba,
        })
    }

    /// Score a KBA submission against a pending record.
    ///
    /// Whatever the outcome, the submission leaves an audit trace on the
    /// record: a one-way digest of the answers, the score, and the submitting
    /// ip. Session-manager errors pass through verbatim.
    pub fn verify_kba_consent(
        &self,
        record_id: &ConsentRecordId,
        session_token: &SessionToken,
        answers: &[u32],
        ip: Option<String>,
        now: Timestamp,
    ) -> Result<ConsentRecord, ConsentError> {
        let record = self.fetch_pending_record(record_id)?;

        let report = self.kba.verify_answers(session_token, answers, now)?;

        self.consents.record_evidence(
            &record.id,
            VerificationEvidence::Kba {
                answer_digest: custodia_crypto::hash_answers(session_token, answers),
                score_pct: report.score_pct,
                submitted_from_ip: ip,
            },
        )?;

        if !report.passed {
            tracing::info!(
                record = %record.id,
                score = report.score_pct,
                threshold = report.pass_threshold_pct,
                "kba verification failed; record stays pending"
            );
            return Err(ConsentError::KbaFailed {
                score_pct: report.score_pct,
                threshold_pct: report.pass_threshold_pct,
            });
        }

        self.grant_consent(record_id, now)
    }

    /// Apply the payment gateway's verdict to a pending record.
    pub fn verify_payment_consent(
        &self,
        record_id: &ConsentRecordId,
        payment_reference: &str,
        payment_verified: bool,
        now: Timestamp,
    ) -> Result<ConsentRecord, ConsentError> {
        let record = self.fetch_pending_record(record_id)?;

        self.consents.record_evidence(
            &record.id,
            VerificationEvidence::Payment {
                reference: payment_reference.to_string(),
                verified: payment_verified,
            },
        )?;

        if !payment_verified {
            tracing::info!(record = %record.id, reference = payment_reference, "payment unverified");
            return Err(ConsentError::PaymentFailed(payment_reference.to_string()));
        }

        self.grant_consent(record_id, now)
    }

    /// Grant consent: one atomic transaction marking the record granted and
    /// flipping the profile to GRANTED / coppa-compliant.
    ///
    /// Idempotent-safe: the record is re-fetched first, so a concurrent or
    /// repeated grant observes `granted` and returns `CONSENT_ALREADY_GRANTED`
    /// instead of double-applying.
    pub fn grant_consent(
        &self,
        record_id: &ConsentRecordId,
        now: Timestamp,
    ) -> Result<ConsentRecord, ConsentError> {
        let record = self.fetch_pending_record(record_id)?;

        // A child holds at most one active consent; a second pending record
        // cannot be granted over a live one.
        if self
            .consents
            .find_active_consent(&record.child, now)?
            .is_some()
        {
            return Err(ConsentError::ConsentAlreadyExists(record.child.to_string()));
        }

        let expires_at = now.plus_secs(self.params.consent_validity_secs);
        self.consents.apply_grant(&GrantTransaction {
            record_id: record.id.clone(),
            child: record.child.clone(),
            consent_date: now,
            expires_at,
        })?;

        tracing::info!(
            record = %record.id,
            child = %record.child,
            valid_for = %format_duration(self.params.consent_validity_secs),
            "consent granted"
        );
        self.push_event(ConsentEvent::ConsentGranted {
            record_id: record.id.clone(),
            child: record.child.clone(),
            expires_at,
        });

        self.fetch_record(record_id)
    }

    /// Withdraw a granted consent: one atomic transaction setting the
    /// revocation fields and flipping the profile to DENIED / non-compliant.
    ///
    /// Revoking an already-revoked record is a no-op returning the record as
    /// is; the original revocation stands.
    pub fn revoke_consent(
        &self,
        record_id: &ConsentRecordId,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<ConsentRecord, ConsentError> {
        let record = self.fetch_record(record_id)?;

        if !record.granted {
            return Err(ConsentError::NotGranted(record_id.to_string()));
        }
        if record.revoked_at.is_some() {
            return Ok(record);
        }

        self.consents.apply_revocation(&RevocationTransaction {
            record_id: record.id.clone(),
            child: record.child.clone(),
            revoked_at: now,
            reason: reason.clone(),
        })?;

        tracing::info!(record = %record.id, child = %record.child, "consent revoked");
        self.push_event(ConsentEvent::ConsentRevoked {
            record_id: record.id.clone(),
            child: record.child.clone(),
            reason,
        });

        self.fetch_record(record_id)
    }

    /// Read-only: the child's current standing.
    pub fn check_consent_status(
        &self,
        child: &UserId,
        now: Timestamp,
    ) -> Result<ConsentStatusReport, ConsentError> {
        let active = self.consents.find_active_consent(child, now)?;
        let report = match active {
            Some(record) => ConsentStatusReport {
                has_active_consent: true,
                days_until_expiry: record.expires_at.map(|exp| exp.days_from(now)),
                record: Some(record),
            },
            None => ConsentStatusReport {
                has_active_consent: false,
                record: None,
                days_until_expiry: None,
            },
        };
        Ok(report)
    }

    /// Read-only: full audit list for a child, newest first.
    pub fn get_consent_history(&self, child: &UserId) -> Result<Vec<ConsentRecord>, ConsentError> {
        Ok(self.consents.consent_history(child)?)
    }

    /// Retention sweep: delete records that never reached a grant and are
    /// older than the retention window, and revoked records whose revocation
    /// is older than it. Granted-and-active records are never touched.
    ///
    /// Invoked periodically by the embedding scheduler; safe to run
    /// concurrently with request handling and the session sweep.
    pub fn cleanup_expired_consent_records(&self, now: Timestamp) -> Result<usize, ConsentError> {
        let cutoff = Timestamp::new(now.as_secs().saturating_sub(self.params.retention_secs));
        let deleted = self
            .consents
            .delete_consent_records(&RetentionFilter { cutoff })?;
        if deleted > 0 {
            tracing::info!(deleted, cutoff = %cutoff, "retention sweep removed consent records");
        }
        Ok(deleted)
    }

    /// One reminder per active consent expiring within the renewal window.
    /// Returns the reminders and queues matching [`ConsentEvent::RenewalDue`]
    /// events; delivery and dedup across runs belong to the caller.
    pub fn send_consent_renewal_reminders(
        &self,
        now: Timestamp,
    ) -> Result<Vec<RenewalReminder>, ConsentError> {
        let expiring = self
            .consents
            .find_expiring(now, self.params.renewal_lead_secs)?;

        let reminders: Vec<RenewalReminder> = expiring
            .into_iter()
            .filter_map(|record| {
                let expires_at = record.expires_at?;
                Some(RenewalReminder {
                    record_id: record.id,
                    child: record.child,
                    parent_email: record.parent_email,
                    expires_at,
                    days_until_expiry: expires_at.days_from(now),
                })
            })
            .collect();

        for reminder in &reminders {
            self.push_event(ConsentEvent::RenewalDue(reminder.clone()));
        }
        if !reminders.is_empty() {
            tracing::info!(count = reminders.len(), "renewal reminders queued");
        }

        Ok(reminders)
    }

    /// Drain pending events for the platform to process.
    pub fn drain_events(&self) -> Vec<ConsentEvent> {
        std::mem::take(&mut *self.pending_events.lock().expect("event buffer poisoned"))
    }

    fn push_event(&self, event: ConsentEvent) {
        self.pending_events
            .lock()
            .expect("event buffer poisoned")
            .push(event);
    }

    fn fetch_user(&self, id: &UserId) -> Result<UserRecord, ConsentError> {
        self.users
            .find_user(id)?
            .ok_or_else(|| ConsentError::UserNotFound(id.to_string()))
    }

    fn fetch_record(&self, id: &ConsentRecordId) -> Result<ConsentRecord, ConsentError> {
        self.consents
            .get_consent_record(id)?
            .ok_or_else(|| ConsentError::RecordNotFound(id.to_string()))
    }

    /// Fetch a record that must not be granted yet.
    fn fetch_pending_record(&self, id: &ConsentRecordId) -> Result<ConsentRecord, ConsentError> {
        let record = self.fetch_record(id)?;
        if record.granted {
            return Err(ConsentError::AlreadyGranted(id.to_string()));
        }
        Ok(record)
    }
}
