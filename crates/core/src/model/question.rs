use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Difficulty, TemplateId};
use crate::templates::Params;

/// Number of answer options shown for every question.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InstanceError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("expected {expected} options, found {found}")]
    WrongOptionCount { expected: usize, found: usize },

    #[error("option {0:?} appears more than once")]
    DuplicateOption(String),

    #[error("correct answer {0:?} is not among the options")]
    MissingCorrect(String),
}

//
// ─── QUESTION INSTANCE ────────────────────────────────────────────────────────
//

/// One concrete, fully resolved problem.
///
/// Options are stored in display order; exactly one of them equals
/// `correct_answer`. Instances are immutable once built so a session can hand
/// out the same one every time its index is revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionInstance {
    template_id: TemplateId,
    difficulty: Difficulty,
    params: Params,
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
    solution: String,
}

impl QuestionInstance {
    /// Build an instance, checking the option invariants.
    ///
    /// # Errors
    ///
    /// Returns `InstanceError` if the prompt is blank, the option count differs
    /// from `OPTION_COUNT`, any option repeats, or the correct answer is absent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        template_id: TemplateId,
        difficulty: Difficulty,
        params: Params,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
        solution: impl Into<String>,
    ) -> Result<Self, InstanceError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(InstanceError::EmptyPrompt);
        }
        if options.len() != OPTION_COUNT {
            return Err(InstanceError::WrongOptionCount {
                expected: OPTION_COUNT,
                found: options.len(),
            });
        }
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.as_str()) {
                return Err(InstanceError::DuplicateOption(option.clone()));
            }
        }
        if !seen.contains(correct_answer.as_str()) {
            return Err(InstanceError::MissingCorrect(correct_answer));
        }

        Ok(Self {
            template_id,
            difficulty,
            params,
            prompt,
            correct_answer,
            options,
            solution: solution.into(),
        })
    }

    #[must_use]
    pub fn template_id(&self) -> TemplateId {
        self.template_id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Resolved parameters the prompt, answer and solution were built from.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn build(options: Vec<String>, correct: &str) -> Result<QuestionInstance, InstanceError> {
        QuestionInstance::new(
            TemplateId::new("test.sum"),
            Difficulty::Easy,
            Params::new([2, 3, 0, 0]),
            "What is $2 + 3$?",
            correct,
            options,
            "$2 + 3 = 5$",
        )
    }

    #[test]
    fn valid_instance_is_accepted() {
        let q = build(opts(&["6", "5", "1", "4"]), "5").unwrap();
        assert!(q.is_correct("5"));
        assert!(q.has_option("6"));
        assert!(!q.is_correct("6"));
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let err = build(opts(&["5", "5", "1", "4"]), "5").unwrap_err();
        assert_eq!(err, InstanceError::DuplicateOption("5".into()));
    }

    #[test]
    fn missing_correct_answer_is_rejected() {
        let err = build(opts(&["6", "7", "1", "4"]), "5").unwrap_err();
        assert!(matches!(err, InstanceError::MissingCorrect(_)));
    }

    #[test]
    fn option_count_is_enforced() {
        let err = build(opts(&["5", "6", "7"]), "5").unwrap_err();
        assert_eq!(
            err,
            InstanceError::WrongOptionCount {
                expected: 4,
                found: 3
            }
        );
    }
}
