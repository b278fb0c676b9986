//! Tunable consent parameters.
//!
//! Every value the compliance team may adjust lives here: quiz thresholds,
//! session lifetimes, consent validity, and the legally mandated retention
//! window. Loadable from a TOML file or built programmatically (e.g. for
//! tests); missing fields fall back to the COPPA defaults.

use crate::time::DAY_SECS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("invalid parameters file: {0}")]
    Parse(String),

    #[error("pass threshold must be 0..=100, got {0}")]
    ThresholdOutOfRange(u32),

    #[error("questions per session must be at least 1")]
    NoQuestions,
}

/// All tunables for the consent core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentParams {
    /// Minimum quiz score (percent) required to pass KBA.
    #[serde(default = "default_pass_threshold_pct")]
    pub pass_threshold_pct: u32,

    /// Lifetime of a KBA quiz session before it self-expires.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Maximum scoring attempts per session before it is destroyed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Questions served per quiz session.
    #[serde(default = "default_questions_per_session")]
    pub questions_per_session: usize,

    /// How long a granted consent remains valid.
    #[serde(default = "default_consent_validity_secs")]
    pub consent_validity_secs: u64,

    /// Age at which inactive consent records become eligible for deletion.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// How far ahead of expiry renewal reminders go out.
    #[serde(default = "default_renewal_lead_secs")]
    pub renewal_lead_secs: u64,

    /// Lifetime of the email-confirmation token minted at initiation.
    #[serde(default = "default_email_token_ttl_secs")]
    pub email_token_ttl_secs: u64,

    /// Suggested cadence for the session expiry sweep. The core never spawns
    /// timers; the embedding scheduler reads this.
    #[serde(default = "default_session_sweep_interval_secs")]
    pub session_sweep_interval_secs: u64,
}

fn default_pass_threshold_pct() -> u32 {
    70
}

fn default_session_ttl_secs() -> u64 {
    15 * 60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_questions_per_session() -> usize {
    5
}

fn default_consent_validity_secs() -> u64 {
    365 * DAY_SECS
}

fn default_retention_secs() -> u64 {
    3 * 365 * DAY_SECS
}

fn default_renewal_lead_secs() -> u64 {
    30 * DAY_SECS
}

fn default_email_token_ttl_secs() -> u64 {
    7 * DAY_SECS
}

fn default_session_sweep_interval_secs() -> u64 {
    5 * 60
}

impl ConsentParams {
    /// The COPPA defaults: 70% pass threshold, 15-minute sessions, 3 attempts,
    /// 5 questions, 1-year consent validity, 3-year retention, 30-day renewal
    /// lead, 7-day email tokens.
    pub fn coppa_defaults() -> Self {
        Self {
            pass_threshold_pct: default_pass_threshold_pct(),
            session_ttl_secs: default_session_ttl_secs(),
            max_attempts: default_max_attempts(),
            questions_per_session: default_questions_per_session(),
            consent_validity_secs: default_consent_validity_secs(),
            retention_secs: default_retention_secs(),
            renewal_lead_secs: default_renewal_lead_secs(),
            email_token_ttl_secs: default_email_token_ttl_secs(),
            session_sweep_interval_secs: default_session_sweep_interval_secs(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(s).map_err(|e| ParamsError::Parse(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ConsentParams is always serializable to TOML")
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.pass_threshold_pct > 100 {
            return Err(ParamsError::ThresholdOutOfRange(self.pass_threshold_pct));
        }
        if self.questions_per_session == 0 {
            return Err(ParamsError::NoQuestions);
        }
        Ok(())
    }
}

/// Default is the COPPA configuration.
impl Default for ConsentParams {
    fn default() -> Self {
        Self::coppa_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coppa_defaults_match_policy() {
        let params = ConsentParams::coppa_defaults();
        assert_eq!(params.pass_threshold_pct, 70);
        assert_eq!(params.session_ttl_secs, 900);
        assert_eq!(params.max_attempts, 3);
        assert_eq!(params.questions_per_session, 5);
        assert_eq!(params.consent_validity_secs, 365 * DAY_SECS);
        assert_eq!(params.retention_secs, 3 * 365 * DAY_SECS);
        assert_eq!(params.renewal_lead_secs, 30 * DAY_SECS);
        assert_eq!(params.email_token_ttl_secs, 7 * DAY_SECS);
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let params = ConsentParams::coppa_defaults();
        let toml_str = params.to_toml_string();
        let parsed = ConsentParams::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.pass_threshold_pct, params.pass_threshold_pct);
        assert_eq!(parsed.retention_secs, params.retention_secs);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed = ConsentParams::from_toml_str("pass_threshold_pct = 80\n").unwrap();
        assert_eq!(parsed.pass_threshold_pct, 80);
        assert_eq!(parsed.max_attempts, 3);
        assert_eq!(parsed.session_ttl_secs, 900);
    }

    #[test]
    fn threshold_over_100_rejected() {
        let result = ConsentParams::from_toml_str("pass_threshold_pct = 150\n");
        assert!(matches!(result, Err(ParamsError::ThresholdOutOfRange(150))));
    }

    #[test]
    fn zero_questions_rejected() {
        let result = ConsentParams::from_toml_str("questions_per_session = 0\n");
        assert!(matches!(result, Err(ParamsError::NoQuestions)));
    }

    #[test]
    fn garbage_toml_is_a_parse_error() {
        assert!(matches!(
            ConsentParams::from_toml_str("not toml at all {{"),
            Err(ParamsError::Parse(_))
        ));
    }
}
