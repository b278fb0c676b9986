use custodia_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KbaError {
    #[error("quiz session not found")]
    SessionNotFound,

    #[error("quiz session has expired; request a new session")]
    SessionExpired,

    #[error("maximum attempts ({0}) exceeded; request a new session")]
    MaxAttemptsExceeded(u32),

    #[error("question bank is empty")]
    EmptyBank,

    #[error("question {0} has no {1} text and no English fallback")]
    MissingText(String, String),

    #[error("duplicate question id {0} in catalog")]
    DuplicateQuestionId(String),

    #[error("question {0}: correct option {1} is out of range")]
    CorrectOptionOutOfRange(String, usize),

    #[error("question {0} needs at least two options")]
    TooFewOptions(String),

    #[error("invalid question catalog: {0}")]
    Catalog(String),

    #[error("session store error: {0}")]
    Store(#[from] StoreError),
}

impl KbaError {
    /// Stable machine-readable code for API layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::MaxAttemptsExceeded(_) => "MAX_ATTEMPTS_EXCEEDED",
            Self::EmptyBank
            | Self::MissingText(..)
            | Self::DuplicateQuestionId(_)
            | Self::CorrectOptionOutOfRange(..)
            | Self::TooFewOptions(_)
            | Self::Catalog(_) => "INVALID_CATALOG",
            Self::Store(_) => "INFRA_ERROR",
        }
    }
}
