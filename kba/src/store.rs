//! The shared session table.
//!
//! Sessions are keyed by token and require per-key mutual exclusion: the
//! expiry check, attempt increment, limit check, and terminal deletion must
//! be one atomic step, otherwise concurrent submissions can slip past the
//! attempt limit. [`SessionStore::claim_attempt`] is that critical section.
//!
//! The store is injected into the session manager (never a module singleton)
//! so deployments can swap in a shared cache backing and tests can inspect
//! the table directly.

use crate::session::KbaSession;
use custodia_store::StoreError;
use custodia_types::{SessionToken, Timestamp};
use std::collections::HashMap;
use std::sync::Mutex;

/// Result of atomically claiming a scoring attempt.
#[derive(Clone, Debug)]
pub enum AttemptClaim {
    /// The attempt was admitted; snapshot of the session as of this attempt.
    Admitted(KbaSession),
    /// The session was past its expiry and has been deleted.
    Expired,
    /// The attempt limit was already spent; the session has been deleted.
    Exhausted,
}

/// Keyed, transient storage for quiz sessions.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: KbaSession) -> Result<(), StoreError>;

    /// Read-only snapshot; never mutates, even for expired sessions.
    fn get(&self, token: &SessionToken) -> Result<Option<KbaSession>, StoreError>;

    /// Remove and return the session. `None` if already gone, so exactly one
    /// caller wins a concurrent removal.
    fn remove(&self, token: &SessionToken) -> Result<Option<KbaSession>, StoreError>;

    /// The scoring critical section: in one atomic step, delete and report
    /// expired sessions, spend one attempt, and delete sessions whose limit
    /// is already spent. `None` means no such session.
    fn claim_attempt(
        &self,
        token: &SessionToken,
        now: Timestamp,
        max_attempts: u32,
    ) -> Result<Option<AttemptClaim>, StoreError>;

    /// Drop every expired session, returning how many were removed.
    fn purge_expired(&self, now: Timestamp) -> Result<usize, StoreError>;

    /// Number of live sessions (expired-but-unswept included).
    fn len(&self) -> Result<usize, StoreError>;
}

/// `Mutex<HashMap>` session table: the production default for a single
/// instance and the deterministic double for tests.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, KbaSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, KbaSession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Backend("session table mutex poisoned".into()))
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: KbaSession) -> Result<(), StoreError> {
        let mut table = self.table()?;
        let key = session.token.as_str().to_string();
        if table.contains_key(&key) {
            return Err(StoreError::Duplicate(session.token.preview().to_string()));
        }
        table.insert(key, session);
        Ok(())
    }

    fn get(&self, token: &SessionToken) -> Result<Option<KbaSession>, StoreError> {
        Ok(self.table()?.get(token.as_str()).cloned())
    }

    fn remove(&self, token: &SessionToken) -> Result<Option<KbaSession>, StoreError> {
        Ok(self.table()?.remove(token.as_str()))
    }

    fn claim_attempt(
        &self,
        token: &SessionToken,
        now: Timestamp,
        max_attempts: u32,
    ) -> Result<Option<AttemptClaim>, StoreError> {
        let mut table = self.table()?;
        let Some(session) = table.get_mut(token.as_str()) else {
            return Ok(None);
        };

        if session.has_expired(now) {
            table.remove(token.as_str());
            return Ok(Some(AttemptClaim::Expired));
        }

        if session.attempts >= max_attempts {
            table.remove(token.as_str());
            return Ok(Some(AttemptClaim::Exhausted));
        }

        session.attempts += 1;
        Ok(Some(AttemptClaim::Admitted(session.clone())))
    }

    fn purge_expired(&self, now: Timestamp) -> Result<usize, StoreError> {
        let mut table = self.table()?;
        let before = table.len();
        table.retain(|_, session| !session.has_expired(now));
        Ok(before - table.len())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.table()?.len())
    }
}
