//! The immutable question catalog and deterministic selection.

use crate::error::KbaError;
use crate::question::{Question, QuestionCategory};
use custodia_crypto::blake2b_256_multi;
use custodia_types::Language;
use std::collections::{BTreeMap, HashSet};

/// An immutable catalog of verification questions, validated at construction.
///
/// Selection is deterministic given a seed: every question gets a score of
/// `Blake2b(seed || id)`, and all ordering decisions flow from those scores.
/// The session manager feeds a fresh random seed per session, so from the
/// outside selection is uniformly random; under test a fixed seed pins the
/// outcome.
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, rejecting catalogs that could misbehave at quiz time:
    /// empty catalogs, duplicate ids, missing English text, fewer than two
    /// options, or a correct index outside the option list.
    pub fn new(questions: Vec<Question>) -> Result<Self, KbaError> {
        if questions.is_empty() {
            return Err(KbaError::EmptyBank);
        }

        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id.clone()) {
                return Err(KbaError::DuplicateQuestionId(q.id.to_string()));
            }
            let Some(english) = q.text.get(&Language::FALLBACK) else {
                return Err(KbaError::MissingText(
                    q.id.to_string(),
                    Language::FALLBACK.to_string(),
                ));
            };
            for text in q.text.values() {
                if text.options.len() < 2 {
                    return Err(KbaError::TooFewOptions(q.id.to_string()));
                }
                if text.options.len() != english.options.len() {
                    return Err(KbaError::Catalog(format!(
                        "question {}: translations must keep option count",
                        q.id
                    )));
                }
                if q.correct_option >= text.options.len() {
                    return Err(KbaError::CorrectOptionOutOfRange(
                        q.id.to_string(),
                        q.correct_option,
                    ));
                }
            }
        }

        Ok(Self { questions })
    }

    /// Load a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, KbaError> {
        let questions: Vec<Question> =
            serde_json::from_str(json).map_err(|e| KbaError::Catalog(e.to_string()))?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct categories present in the catalog.
    pub fn categories(&self) -> Vec<QuestionCategory> {
        let set: HashSet<QuestionCategory> =
            self.questions.iter().map(|q| q.category).collect();
        QuestionCategory::ALL
            .into_iter()
            .filter(|c| set.contains(c))
            .collect()
    }

    /// Select up to `count` questions for one session.
    ///
    /// Category spread first: each category is represented by its
    /// best-scoring question, and categories enter in score order. If that
    /// yields fewer than `count`, the best-scoring unused questions from the
    /// whole catalog fill the rest. The final list is re-ordered by a
    /// domain-separated second hash, so a question's position reveals nothing
    /// about its category or whether it was a filler.
    pub fn select(&self, count: usize, seed: &[u8; 32]) -> Vec<&Question> {
        if count == 0 {
            return Vec::new();
        }

        let scored: Vec<(usize, [u8; 32])> = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| (i, blake2b_256_multi(&[seed, q.id.as_str().as_bytes()])))
            .collect();

        // One pick per category, each category represented by its lowest score.
        let mut best_per_category: BTreeMap<QuestionCategory, (usize, [u8; 32])> = BTreeMap::new();
        for &(i, score) in &scored {
            let category = self.questions[i].category;
            let replace = match best_per_category.get(&category) {
                Some(&(_, best)) => score < best,
                None => true,
            };
            if replace {
                best_per_category.insert(category, (i, score));
            }
        }

        let mut picks: Vec<(usize, [u8; 32])> = best_per_category.into_values().collect();
        picks.sort_by_key(|&(_, score)| score);
        picks.truncate(count);

        // Fill remaining slots from the unused questions, best score first.
        if picks.len() < count {
            let used: HashSet<usize> = picks.iter().map(|&(i, _)| i).collect();
            let mut rest: Vec<(usize, [u8; 32])> = scored
                .iter()
                .filter(|(i, _)| !used.contains(i))
                .copied()
                .collect();
            rest.sort_by_key(|&(_, score)| score);
            picks.extend(rest.into_iter().take(count - picks.len()));
        }

        // Final order from a second, domain-separated hash.
        picks.sort_by_key(|&(i, _)| {
            blake2b_256_multi(&[b"order", seed, self.questions[i].id.as_str().as_bytes()])
        });

        picks.into_iter().map(|(i, _)| &self.questions[i]).collect()
    }
}
