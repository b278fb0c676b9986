//! Quiz session lifecycle: generate, score, inspect, sweep.

use crate::bank::QuestionBank;
use crate::error::KbaError;
use crate::session::{KbaSession, SessionChallenge, SessionQuestion, SessionStatus, VerifyReport};
use crate::store::{AttemptClaim, SessionStore};
use custodia_types::{ConsentParams, Language, SessionToken, Timestamp};
use std::sync::Arc;

/// Issues and scores ephemeral quiz sessions.
///
/// All time-sensitive operations take `now` from the caller, so the manager
/// itself never reads the clock and every path is deterministic under test.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    bank: Arc<QuestionBank>,
    params: ConsentParams,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, bank: Arc<QuestionBank>, params: ConsentParams) -> Self {
        Self { store, bank, params }
    }

    pub fn params(&self) -> &ConsentParams {
        &self.params
    }

    /// Create a session and return its public challenge.
    ///
    /// Token and selection seed come from OS entropy; everything else is pure
    /// in-memory work, so this composes inside a larger transaction without
    /// blocking.
    pub fn generate_session(
        &self,
        language: Language,
        now: Timestamp,
    ) -> Result<SessionChallenge, KbaError> {
        let token = custodia_crypto::session_token();
        let seed = custodia_crypto::random_seed();

        let selected = self.bank.select(self.params.questions_per_session, &seed);
        let expires_at = now.plus_secs(self.params.session_ttl_secs);

        let session = KbaSession {
            token: token.clone(),
            language,
            questions: selected
                .iter()
                .map(|q| SessionQuestion {
                    id: q.id.clone(),
                    correct_option: q.correct_option as u32,
                })
                .collect(),
            created_at: now,
            expires_at,
            attempts: 0,
        };
        self.store.insert(session)?;

        tracing::debug!(
            token = token.preview(),
            questions = selected.len(),
            %language,
            "kba session generated"
        );

        Ok(SessionChallenge {
            token,
            questions: selected.iter().map(|q| q.public_view(language)).collect(),
            expires_at,
        })
    }

    /// Score one submission.
    ///
    /// Answers are option indices in session question order; missing entries
    /// score as incorrect, surplus entries are ignored. A pass consumes the
    /// session; a fail with attempts remaining leaves it open with the same
    /// question set. Expiry and exhaustion both destroy the session so its
    /// content cannot be replayed.
    pub fn verify_answers(
        &self,
        token: &SessionToken,
        answers: &[u32],
        now: Timestamp,
    ) -> Result<VerifyReport, KbaError> {
        let claim = self
            .store
            .claim_attempt(token, now, self.params.max_attempts)?;

        let session = match claim {
            None => return Err(KbaError::SessionNotFound),
            Some(AttemptClaim::Expired) => return Err(KbaError::SessionExpired),
            Some(AttemptClaim::Exhausted) => {
                return Err(KbaError::MaxAttemptsExceeded(self.params.max_attempts))
            }
            Some(AttemptClaim::Admitted(session)) => session,
        };

        let total = session.questions.len() as u32;
        let correct = session
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| answers.get(*i) == Some(&q.correct_option))
            .count() as u32;

        let score_pct = if total == 0 { 0 } else { correct * 100 / total };
        let passed = score_pct >= self.params.pass_threshold_pct;

        if passed {
            // Single use: a passed session is spent.
            self.store.remove(token)?;
        }

        tracing::debug!(
            token = token.preview(),
            score_pct,
            passed,
            attempt = session.attempts,
            "kba submission scored"
        );

        Ok(VerifyReport {
            passed,
            score_pct,
            total_questions: total,
            correct_answers: correct,
            pass_threshold_pct: self.params.pass_threshold_pct,
            token: token.clone(),
            completed_at: now,
        })
    }

    /// Read-only standing of a session. Never mutates the table.
    pub fn get_session_status(
        &self,
        token: &SessionToken,
        now: Timestamp,
    ) -> Result<SessionStatus, KbaError> {
        let status = match self.store.get(token)? {
            None => SessionStatus {
                valid: false,
                expires_at: None,
                attempts: None,
                max_attempts: self.params.max_attempts,
            },
            Some(session) => SessionStatus {
                valid: !session.has_expired(now) && session.attempts < self.params.max_attempts,
                expires_at: Some(session.expires_at),
                attempts: Some(session.attempts),
                max_attempts: self.params.max_attempts,
            },
        };
        Ok(status)
    }

    /// Sweep expired sessions. Invoked periodically by the embedding
    /// scheduler; safe to run concurrently with request handling.
    pub fn cleanup_expired_sessions(&self, now: Timestamp) -> Result<usize, KbaError> {
        let removed = self.store.purge_expired(now)?;
        if removed > 0 {
            tracing::info!(removed, "expired kba sessions swept");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_bank;
    use crate::question::{Difficulty, Question, QuestionCategory, QuestionId, QuestionText};
    use crate::store::InMemorySessionStore;
    use std::collections::BTreeMap;
    use std::collections::HashSet;

    /// Bank where option 0 is always correct, so tests can submit
    /// all-correct or all-wrong without knowing the draw.
    fn rigged_bank() -> QuestionBank {
        let questions = QuestionCategory::ALL
            .into_iter()
            .map(|category| {
                let mut text = BTreeMap::new();
                text.insert(
                    Language::En,
                    QuestionText {
                        prompt: format!("{category:?}?"),
                        options: vec!["right".into(), "wrong".into(), "also wrong".into()],
                    },
                );
                Question {
                    id: QuestionId::new(format!("q-{}", category.as_str())),
                    category,
                    difficulty: Difficulty::Easy,
                    text,
                    correct_option: 0,
                }
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn manager_with(bank: QuestionBank) -> SessionManager {
        SessionManager::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(bank),
            ConsentParams::coppa_defaults(),
        )
    }

    fn now() -> Timestamp {
        Timestamp::new(1_700_000_000)
    }

    const ALL_CORRECT: [u32; 5] = [0, 0, 0, 0, 0];
    const ALL_WRONG: [u32; 5] = [1, 1, 1, 1, 1];

    #[test]
    fn generated_sessions_have_config_count_and_unique_ids() {
        let manager = manager_with(builtin_bank().unwrap());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        assert_eq!(challenge.questions.len(), 5);
        let ids: HashSet<&str> = challenge.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 5, "no duplicate question ids in a session");
    }

    #[test]
    fn challenge_serialization_never_leaks_answers() {
        let manager = manager_with(builtin_bank().unwrap());
        let challenge = manager.generate_session(Language::En, now()).unwrap();
        let json = serde_json::to_string(&challenge).unwrap();
        assert!(!json.contains("correct_option"));
    }

    #[test]
    fn tokens_are_unique_across_sessions() {
        let manager = manager_with(builtin_bank().unwrap());
        let a = manager.generate_session(Language::En, now()).unwrap();
        let b = manager.generate_session(Language::En, now()).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn all_correct_scores_100_and_consumes_session() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        let report = manager
            .verify_answers(&challenge.token, &ALL_CORRECT, now())
            .unwrap();
        assert!(report.passed);
        assert_eq!(report.score_pct, 100);
        assert_eq!(report.correct_answers, 5);
        assert_eq!(report.total_questions, 5);
        assert_eq!(report.pass_threshold_pct, 70);

        // Single use: the passed session is gone.
        assert!(matches!(
            manager.verify_answers(&challenge.token, &ALL_CORRECT, now()),
            Err(KbaError::SessionNotFound)
        ));
    }

    #[test]
    fn all_wrong_scores_0_and_leaves_session_open() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        let report = manager
            .verify_answers(&challenge.token, &ALL_WRONG, now())
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.score_pct, 0);

        let status = manager.get_session_status(&challenge.token, now()).unwrap();
        assert!(status.valid, "failed session stays open with attempts left");
        assert_eq!(status.attempts, Some(1));
    }

    #[test]
    fn four_of_five_passes_at_default_threshold() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        let report = manager
            .verify_answers(&challenge.token, &[0, 0, 0, 0, 1], now())
            .unwrap();
        assert!(report.passed);
        assert_eq!(report.score_pct, 80);
    }

    #[test]
    fn two_of_five_fails_at_default_threshold() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        let report = manager
            .verify_answers(&challenge.token, &[0, 0, 1, 1, 1], now())
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.score_pct, 40);
    }

    #[test]
    fn short_answer_vectors_score_missing_as_incorrect() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        let report = manager
            .verify_answers(&challenge.token, &[0, 0], now())
            .unwrap();
        assert_eq!(report.correct_answers, 2);
        assert_eq!(report.score_pct, 40);
    }

    #[test]
    fn expired_session_reports_expired_then_not_found() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();
        let after_ttl = now().plus_secs(15 * 60);

        assert!(matches!(
            manager.verify_answers(&challenge.token, &ALL_CORRECT, after_ttl),
            Err(KbaError::SessionExpired)
        ));
        assert!(matches!(
            manager.verify_answers(&challenge.token, &ALL_CORRECT, after_ttl),
            Err(KbaError::SessionNotFound)
        ));
    }

    #[test]
    fn attempt_limit_exhausts_and_destroys_session() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        for _ in 0..3 {
            let report = manager
                .verify_answers(&challenge.token, &ALL_WRONG, now())
                .unwrap();
            assert!(!report.passed);
        }

        assert!(matches!(
            manager.verify_answers(&challenge.token, &ALL_CORRECT, now()),
            Err(KbaError::MaxAttemptsExceeded(3))
        ));
        // Destroyed, not merely locked.
        assert!(matches!(
            manager.verify_answers(&challenge.token, &ALL_CORRECT, now()),
            Err(KbaError::SessionNotFound)
        ));
    }

    #[test]
    fn retry_reuses_the_same_question_set() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();

        manager
            .verify_answers(&challenge.token, &ALL_WRONG, now())
            .unwrap();

        // Second attempt still scores against the same five questions.
        let report = manager
            .verify_answers(&challenge.token, &ALL_CORRECT, now())
            .unwrap();
        assert!(report.passed);
        assert_eq!(report.total_questions, 5);
    }

    #[test]
    fn status_for_unknown_token() {
        let manager = manager_with(rigged_bank());
        let status = manager
            .get_session_status(&SessionToken::new("missing"), now())
            .unwrap();
        assert!(!status.valid);
        assert_eq!(status.expires_at, None);
        assert_eq!(status.max_attempts, 3);
    }

    #[test]
    fn status_is_read_only_past_expiry() {
        let manager = manager_with(rigged_bank());
        let challenge = manager.generate_session(Language::En, now()).unwrap();
        let after_ttl = now().plus_secs(3_600);

        let status = manager.get_session_status(&challenge.token, after_ttl).unwrap();
        assert!(!status.valid);
        assert_eq!(status.expires_at, Some(challenge.expires_at));

        // The sweep, not the status read, removes it.
        assert_eq!(manager.cleanup_expired_sessions(after_ttl).unwrap(), 1);
        assert_eq!(manager.cleanup_expired_sessions(after_ttl).unwrap(), 0);
    }

    #[test]
    fn cleanup_spares_live_sessions() {
        let manager = manager_with(rigged_bank());
        let _old = manager.generate_session(Language::En, now()).unwrap();
        let fresh_time = now().plus_secs(10 * 60);
        let fresh = manager.generate_session(Language::En, fresh_time).unwrap();

        let removed = manager
            .cleanup_expired_sessions(now().plus_secs(15 * 60))
            .unwrap();
        assert_eq!(removed, 1);

        let status = manager
            .get_session_status(&fresh.token, now().plus_secs(15 * 60))
            .unwrap();
        assert!(status.valid);
    }

    #[test]
    fn spanish_sessions_serve_spanish_prompts() {
        let manager = manager_with(builtin_bank().unwrap());
        let challenge = manager.generate_session(Language::Es, now()).unwrap();
        // Every builtin question has a Spanish translation with "¿" prompts.
        assert!(challenge.questions.iter().all(|q| q.prompt.starts_with('¿')));
    }
}
