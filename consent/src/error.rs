use custodia_kba::KbaError;
use custodia_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("user {0} is not flagged as a minor; parental consent does not apply")]
    NotAMinor(String),

    #[error("an active consent already exists for child {0}")]
    ConsentAlreadyExists(String),

    #[error("consent record {0} not found")]
    RecordNotFound(String),

    #[error("consent record {0} is already granted")]
    AlreadyGranted(String),

    #[error("consent record {0} has not been granted")]
    NotGranted(String),

    #[error("quiz score {score_pct}% is below the {threshold_pct}% pass threshold")]
    KbaFailed { score_pct: u32, threshold_pct: u32 },

    #[error("payment {0} was not verified")]
    PaymentFailed(String),

    #[error(transparent)]
    Kba(#[from] KbaError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ConsentError {
    /// Stable machine-readable code for API layers. Session-manager codes
    /// pass through verbatim; storage failures surface as the retryable
    /// `INFRA_ERROR` category, never as a business-rule code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::NotAMinor(_) => "NOT_A_MINOR",
            Self::ConsentAlreadyExists(_) => "CONSENT_ALREADY_EXISTS",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::AlreadyGranted(_) => "CONSENT_ALREADY_GRANTED",
            Self::NotGranted(_) => "CONSENT_NOT_GRANTED",
            Self::KbaFailed { .. } => "KBA_FAILED",
            Self::PaymentFailed(_) => "PAYMENT_FAILED",
            Self::Kba(e) => e.code(),
            Self::Store(_) => "INFRA_ERROR",
        }
    }
}
