//! Language tags for localized quiz content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the platform serves quiz content in.
///
/// English is the fallback: a question with no translation for the requested
/// language is served in English rather than dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    /// The language used when a translation is missing.
    pub const FALLBACK: Self = Self::En;

    pub fn as_str(&self) -> &str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
