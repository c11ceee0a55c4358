use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question {0} has no answer options")]
    NoOptions(QuestionId),

    #[error("question {0} has no correct option")]
    NoCorrectOption(QuestionId),

    #[error("single-select question {0} has {count} correct options")]
    TooManyCorrectOptions { id: QuestionId, count: usize },

    #[error("question {id} has duplicate option id {option}")]
    DuplicateOption { id: QuestionId, option: OptionId },
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Whether a question accepts one selected option or a set of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    Single,
    Multiple,
}

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            correct,
        }
    }
}

/// A quiz question with its ordered answer options.
///
/// Correctness is an exact-set rule: the selection must match the correct
/// option set with no extras and no omissions. Partial credit does not
/// exist at this level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    id: QuestionId,
    prompt: String,
    kind: QuestionKind,
    options: Vec<AnswerOption>,
    explanation: Option<String>,
}

impl QuizQuestion {
    /// Build a question, validating its option set.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoOptions` for an empty option list,
    /// `QuizError::NoCorrectOption` when nothing is marked correct,
    /// `QuizError::TooManyCorrectOptions` when a single-select question
    /// marks more than one option correct, and `QuizError::DuplicateOption`
    /// for repeated option ids.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionKind,
        options: Vec<AnswerOption>,
        explanation: Option<String>,
    ) -> Result<Self, QuizError> {
        if options.is_empty() {
            return Err(QuizError::NoOptions(id));
        }

        let mut seen = BTreeSet::new();
        for option in &options {
            if !seen.insert(option.id) {
                return Err(QuizError::DuplicateOption {
                    id,
                    option: option.id,
                });
            }
        }

        let correct = options.iter().filter(|o| o.correct).count();
        if correct == 0 {
            return Err(QuizError::NoCorrectOption(id));
        }
        if kind == QuestionKind::Single && correct > 1 {
            return Err(QuizError::TooManyCorrectOptions { id, count: correct });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            kind,
            options,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Explanation revealed after the answer is submitted, if any.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Ids of all options marked correct.
    #[must_use]
    pub fn correct_option_ids(&self) -> BTreeSet<OptionId> {
        self.options
            .iter()
            .filter(|o| o.correct)
            .map(|o| o.id)
            .collect()
    }

    /// Decide whether a selection answers this question correctly.
    ///
    /// Single-select: exactly one selected id, equal to the correct one.
    /// Multi-select: the selected set equals the correct set — a missing
    /// correct option and an extra wrong option are both failures.
    ///
    /// Empty selections are the caller's problem: the session controller
    /// rejects a submit with no selection before evaluation runs.
    #[must_use]
    pub fn evaluate(&self, selected: &BTreeSet<OptionId>) -> bool {
        match self.kind {
            QuestionKind::Single => {
                selected.len() == 1 && *selected == self.correct_option_ids()
            }
            QuestionKind::Multiple => *selected == self.correct_option_ids(),
        }
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDefinitionError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Question(#[from] QuizError),
}

/// A named bank of questions backing a chapter quiz or the final exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizDefinitionError::EmptyTitle` if the title is blank.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<QuizQuestion>,
    ) -> Result<Self, QuizDefinitionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizDefinitionError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Consume the quiz, yielding its questions in authored order.
    #[must_use]
    pub fn into_questions(self) -> Vec<QuizQuestion> {
        self.questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(id: u64, correct: bool) -> AnswerOption {
        AnswerOption::new(OptionId::new(id), format!("Option {id}"), correct)
    }

    fn selection(ids: &[u64]) -> BTreeSet<OptionId> {
        ids.iter().copied().map(OptionId::new).collect()
    }

    fn single_question() -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(1),
            "Pick one",
            QuestionKind::Single,
            vec![opt(1, false), opt(2, true), opt(3, false)],
            Some("Because 2.".into()),
        )
        .unwrap()
    }

    fn multiple_question() -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(2),
            "Pick all that apply",
            QuestionKind::Multiple,
            vec![opt(1, true), opt(2, false), opt(3, true)],
            None,
        )
        .unwrap()
    }

    #[test]
    fn question_requires_options() {
        let err = QuizQuestion::new(
            QuestionId::new(1),
            "Empty",
            QuestionKind::Single,
            Vec::new(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoOptions(QuestionId::new(1)));
    }

    #[test]
    fn question_requires_a_correct_option() {
        let err = QuizQuestion::new(
            QuestionId::new(1),
            "Trick",
            QuestionKind::Multiple,
            vec![opt(1, false), opt(2, false)],
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoCorrectOption(QuestionId::new(1)));
    }

    #[test]
    fn single_question_rejects_two_correct_options() {
        let err = QuizQuestion::new(
            QuestionId::new(1),
            "Ambiguous",
            QuestionKind::Single,
            vec![opt(1, true), opt(2, true)],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizError::TooManyCorrectOptions {
                id: QuestionId::new(1),
                count: 2
            }
        );
    }

    #[test]
    fn duplicate_option_ids_are_rejected() {
        let err = QuizQuestion::new(
            QuestionId::new(1),
            "Dup",
            QuestionKind::Single,
            vec![opt(1, true), opt(1, false)],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizError::DuplicateOption {
                id: QuestionId::new(1),
                option: OptionId::new(1)
            }
        );
    }

    #[test]
    fn single_select_matches_only_the_correct_id() {
        let q = single_question();
        assert!(q.evaluate(&selection(&[2])));
        assert!(!q.evaluate(&selection(&[1])));
        assert!(!q.evaluate(&selection(&[3])));
        // Two selections on a single-select question are never correct.
        assert!(!q.evaluate(&selection(&[1, 2])));
    }

    #[test]
    fn multi_select_requires_the_exact_set() {
        let q = multiple_question();
        assert!(q.evaluate(&selection(&[1, 3])));
        // Missing one correct option.
        assert!(!q.evaluate(&selection(&[1])));
        // Extra incorrect option.
        assert!(!q.evaluate(&selection(&[1, 2, 3])));
        assert!(!q.evaluate(&selection(&[2])));
    }

    #[test]
    fn selection_order_is_irrelevant() {
        let q = multiple_question();
        assert!(q.evaluate(&selection(&[3, 1])));
    }

    #[test]
    fn quiz_requires_title() {
        let err = Quiz::new(QuizId::new(1), "  ", vec![single_question()]).unwrap_err();
        assert_eq!(err, QuizDefinitionError::EmptyTitle);
    }
}
