//! The compiled-in bilingual question catalog.
//!
//! Questions target knowledge an adult acquires through everyday financial,
//! civic, and legal life; a child guessing has no edge beyond chance. Every
//! question ships in English and Spanish with option order preserved, so
//! `correct_option` is language-independent.

use crate::bank::QuestionBank;
use crate::error::KbaError;
use crate::question::{Difficulty, Question, QuestionCategory, QuestionId, QuestionText};
use custodia_types::Language;
use std::collections::BTreeMap;

fn q(
    id: &str,
    category: QuestionCategory,
    difficulty: Difficulty,
    correct_option: usize,
    en: (&str, &[&str]),
    es: (&str, &[&str]),
) -> Question {
    let mut text = BTreeMap::new();
    text.insert(
        Language::En,
        QuestionText {
            prompt: en.0.to_string(),
            options: en.1.iter().map(|s| s.to_string()).collect(),
        },
    );
    text.insert(
        Language::Es,
        QuestionText {
            prompt: es.0.to_string(),
            options: es.1.iter().map(|s| s.to_string()).collect(),
        },
    );
    Question {
        id: QuestionId::new(id),
        category,
        difficulty,
        text,
        correct_option,
    }
}

/// Build the default catalog: two questions per category, bilingual.
pub fn builtin_bank() -> Result<QuestionBank, KbaError> {
    QuestionBank::new(vec![
        q(
            "fin-apr",
            QuestionCategory::Financial,
            Difficulty::Medium,
            2,
            (
                "What does APR stand for on a loan statement?",
                &[
                    "Approved Payment Record",
                    "Applied Principal Rate",
                    "Annual Percentage Rate",
                    "Average Payment Ratio",
                ],
            ),
            (
                "¿Qué significa APR en un estado de préstamo?",
                &[
                    "Registro de Pago Aprobado",
                    "Tasa de Capital Aplicado",
                    "Tasa de Porcentaje Anual",
                    "Proporción de Pago Promedio",
                ],
            ),
        ),
        q(
            "fin-w2",
            QuestionCategory::Financial,
            Difficulty::Medium,
            0,
            (
                "Which form does a U.S. employer send each year summarizing your wages?",
                &["W-2", "I-9", "1098-T", "W-9"],
            ),
            (
                "¿Qué formulario envía cada año un empleador de EE. UU. resumiendo sus salarios?",
                &["W-2", "I-9", "1098-T", "W-9"],
            ),
        ),
        q(
            "id-ssn",
            QuestionCategory::Identity,
            Difficulty::Easy,
            1,
            (
                "How many digits does a U.S. Social Security number have?",
                &["7", "9", "10", "12"],
            ),
            (
                "¿Cuántos dígitos tiene un número de Seguro Social de EE. UU.?",
                &["7", "9", "10", "12"],
            ),
        ),
        q(
            "id-license",
            QuestionCategory::Identity,
            Difficulty::Easy,
            3,
            (
                "Which document typically shows both your date of birth and home address?",
                &[
                    "A library card",
                    "A transit pass",
                    "A gym membership card",
                    "A driver's license",
                ],
            ),
            (
                "¿Qué documento suele mostrar su fecha de nacimiento y su domicilio?",
                &[
                    "Una tarjeta de biblioteca",
                    "Un pase de transporte",
                    "Una tarjeta de gimnasio",
                    "Una licencia de conducir",
                ],
            ),
        ),
        q(
            "hist-wall",
            QuestionCategory::Historical,
            Difficulty::Medium,
            2,
            (
                "In which decade did the Berlin Wall come down?",
                &["1960s", "1970s", "1980s", "1990s"],
            ),
            (
                "¿En qué década cayó el Muro de Berlín?",
                &[
                    "Años sesenta",
                    "Años setenta",
                    "Años ochenta",
                    "Años noventa",
                ],
            ),
        ),
        q(
            "hist-moon",
            QuestionCategory::Historical,
            Difficulty::Easy,
            1,
            (
                "In which year did humans first walk on the Moon?",
                &["1959", "1969", "1975", "1981"],
            ),
            (
                "¿En qué año caminó el ser humano por primera vez sobre la Luna?",
                &["1959", "1969", "1975", "1981"],
            ),
        ),
        q(
            "geo-capital",
            QuestionCategory::Geographic,
            Difficulty::Easy,
            0,
            (
                "Which city is the capital of the United States?",
                &["Washington, D.C.", "New York City", "Philadelphia", "Boston"],
            ),
            (
                "¿Qué ciudad es la capital de los Estados Unidos?",
                &["Washington, D. C.", "Nueva York", "Filadelfia", "Boston"],
            ),
        ),
        q(
            "geo-sunshine",
            QuestionCategory::Geographic,
            Difficulty::Medium,
            2,
            (
                "Which U.S. state is nicknamed the Sunshine State?",
                &["Arizona", "California", "Florida", "Texas"],
            ),
            (
                "¿Qué estado de EE. UU. es apodado el Estado del Sol?",
                &["Arizona", "California", "Florida", "Texas"],
            ),
        ),
        q(
            "leg-vote",
            QuestionCategory::Legal,
            Difficulty::Easy,
            1,
            (
                "What is the minimum voting age in U.S. federal elections?",
                &["16", "18", "21", "25"],
            ),
            (
                "¿Cuál es la edad mínima para votar en las elecciones federales de EE. UU.?",
                &["16", "18", "21", "25"],
            ),
        ),
        q(
            "leg-jury",
            QuestionCategory::Legal,
            Difficulty::Medium,
            3,
            (
                "Which civic duty can a court summon an adult to perform?",
                &["Road patrol", "Fire watch", "Census taking", "Jury duty"],
            ),
            (
                "¿A qué deber cívico puede convocar un tribunal a un adulto?",
                &[
                    "Patrulla vial",
                    "Vigilancia de incendios",
                    "Levantamiento del censo",
                    "Servir como jurado",
                ],
            ),
        ),
    ])
}
