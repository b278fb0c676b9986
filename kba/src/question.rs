//! Verification questions and their public (answer-free) projection.

use custodia_types::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a question within the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Knowledge domains a question draws on. Sessions prefer one question per
/// category so a quiz never leans on a single domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Financial,
    Identity,
    Historical,
    Geographic,
    Legal,
}

impl QuestionCategory {
    pub const ALL: [Self; 5] = [
        Self::Financial,
        Self::Identity,
        Self::Historical,
        Self::Geographic,
        Self::Legal,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Financial => "financial",
            Self::Identity => "identity",
            Self::Historical => "historical",
            Self::Geographic => "geographic",
            Self::Legal => "legal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Localized prompt and options for one language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionText {
    pub prompt: String,
    pub options: Vec<String>,
}

/// A catalog question. Immutable once the bank is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    /// Per-language text. English is mandatory (the fallback); the bank
    /// constructor rejects catalogs violating that.
    pub text: BTreeMap<Language, QuestionText>,
    /// Index into `options` of the correct answer. Same index must be correct
    /// in every language; translations keep option order.
    pub correct_option: usize,
}

impl Question {
    /// Text in the requested language, falling back to English.
    pub fn text_for(&self, language: Language) -> &QuestionText {
        self.text
            .get(&language)
            .or_else(|| self.text.get(&Language::FALLBACK))
            .expect("bank construction guarantees English text")
    }

    /// The answer-free projection served to quiz takers.
    pub fn public_view(&self, language: Language) -> PublicQuestion {
        let text = self.text_for(language);
        PublicQuestion {
            id: self.id.clone(),
            prompt: text.prompt.clone(),
            options: text.options.clone(),
        }
    }
}

/// What the caller sees: prompt and options only. The correct index and the
/// category never leave this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
}
