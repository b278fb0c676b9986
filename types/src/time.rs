//! Timestamp type used throughout the consent core.
//!
//! Timestamps are Unix epoch seconds (UTC). Expiry checks compare against a
//! `now` supplied by the caller, so every time-sensitive operation is
//! deterministic under test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in one day.
pub const DAY_SECS: u64 = 86_400;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(duration_secs)
    }

    /// This timestamp shifted forward, saturating at `u64::MAX`.
    pub fn plus_secs(&self, secs: u64) -> Timestamp {
        Self(self.0.saturating_add(secs))
    }

    /// Whole days from `now` until this timestamp. Zero if already past.
    pub fn days_from(&self, now: Timestamp) -> u64 {
        self.0.saturating_sub(now.0) / DAY_SECS
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive_at_boundary() {
        let created = Timestamp::new(1000);
        assert!(!created.has_expired(900, Timestamp::new(1899)));
        assert!(created.has_expired(900, Timestamp::new(1900)));
    }

    #[test]
    fn plus_secs_saturates() {
        let t = Timestamp::new(u64::MAX - 5);
        assert_eq!(t.plus_secs(100).as_secs(), u64::MAX);
    }

    #[test]
    fn days_from_rounds_down() {
        let expiry = Timestamp::new(10 * DAY_SECS + 3600);
        assert_eq!(expiry.days_from(Timestamp::new(0)), 10);
        assert_eq!(expiry.days_from(Timestamp::new(11 * DAY_SECS)), 0);
    }

    #[test]
    fn elapsed_since_saturates_for_future_timestamps() {
        let t = Timestamp::new(5000);
        assert_eq!(t.elapsed_since(Timestamp::new(4000)), 0);
        assert_eq!(t.elapsed_since(Timestamp::new(6000)), 1000);
    }
}
