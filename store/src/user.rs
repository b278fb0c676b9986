//! User and profile storage.
//!
//! Users are owned by the platform's user service; the consent core reads
//! them and mutates only the consent-related profile fields, always through
//! the atomic grant/revocation transactions in [`crate::consent`]. The one
//! exception is the email-confirmation token, written at initiation.

use crate::StoreError;
use custodia_types::{Language, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Consent state mirrored onto the profile for fast permission checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParentalConsentStatus {
    Pending,
    Granted,
    Denied,
}

/// One-time token for the email verification method.
///
/// Minted at initiation with a 7-day expiry; redeemed by an out-of-band
/// confirmation flow that then calls `grant_consent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailToken {
    pub token: String,
    pub expires_at: Timestamp,
    pub parent_email: String,
    pub parent_name: Option<String>,
}

/// The consent-relevant slice of a user profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    /// Whether the account belongs to a child under the consent age.
    pub is_minor: bool,
    /// Preferred language, used to localize quiz content.
    pub language: Language,
    pub parental_consent_status: ParentalConsentStatus,
    pub parental_consent_date: Option<Timestamp>,
    pub coppa_compliant: bool,
    pub email_token: Option<EmailToken>,
}

impl Profile {
    /// A minor profile with no consent yet.
    pub fn minor(language: Language) -> Self {
        Self {
            is_minor: true,
            language,
            parental_consent_status: ParentalConsentStatus::Pending,
            parental_consent_date: None,
            coppa_compliant: false,
            email_token: None,
        }
    }

    /// An adult profile; consent never applies.
    pub fn adult(language: Language) -> Self {
        Self {
            is_minor: false,
            ..Self::minor(language)
        }
    }
}

/// A user as the consent core sees it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub profile: Profile,
}

/// Read access to users plus the email-token write.
pub trait UserStore: Send + Sync {
    /// Look up a user with their profile. `None` if unknown.
    fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Attach an email-confirmation token to the user's profile.
    fn set_email_token(&self, id: &UserId, token: EmailToken) -> Result<(), StoreError>;
}
