use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use course_core::model::{OptionId, QuestionKind, QuizId, QuizQuestion};
use course_core::progress::percent;
use storage::repository::ExamKind;

use super::progress::ExamProgress;
use crate::error::ExamError;

/// Default pass mark for chapter quizzes and final exams.
pub const DEFAULT_PASSING_PERCENT: u8 = 60;

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// Per-question answer state within one session.
///
/// Until `submitted` is set the selection is editable; afterwards it is
/// locked and `correct` is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attempt {
    selected: BTreeSet<OptionId>,
    submitted: bool,
    correct: bool,
}

impl Attempt {
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<OptionId> {
        &self.selected
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Correctness as revealed at submission; `None` while still editable.
    #[must_use]
    pub fn result(&self) -> Option<bool> {
        self.submitted.then_some(self.correct)
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What the learner sees right after submitting one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub correct: bool,
    pub explanation: Option<String>,
}

/// Final result of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamOutcome {
    pub score: u32,
    pub total_questions: u32,
    pub percent: u8,
    pub passed: bool,
}

/// Result of advancing past a submitted question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStep {
    /// Moved on; the new current question index.
    Question(usize),
    /// That was the last question; the session is now complete.
    Completed(ExamOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one pass through a quiz or exam.
///
/// A session is a caller-owned value: one per quiz invocation, discarded
/// on navigation away, never shared between views. Two open quiz tabs
/// mean two sessions with independent scores.
///
/// The flow per question is select → submit → advance; `back` revisits
/// earlier questions without touching the score, restoring whatever
/// submission state they were left in.
pub struct ExamSession {
    quiz_id: QuizId,
    kind: ExamKind,
    questions: Vec<QuizQuestion>,
    attempts: Vec<Attempt>,
    current: usize,
    score: u32,
    passing_percent: u8,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ExamSession {
    /// Create a session over an ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Empty` if no questions are provided.
    pub fn new(
        quiz_id: QuizId,
        kind: ExamKind,
        questions: Vec<QuizQuestion>,
        passing_percent: u8,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ExamError> {
        if questions.is_empty() {
            return Err(ExamError::Empty);
        }

        let attempts = vec![Attempt::default(); questions.len()];
        Ok(Self {
            quiz_id,
            kind,
            questions,
            attempts,
            current: 0,
            score: 0,
            passing_percent,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn kind(&self) -> ExamKind {
        self.kind
    }

    #[must_use]
    pub fn passing_percent(&self) -> u8 {
        self.passing_percent
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Count of correctly answered questions so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    /// Attempt state for any question index, submitted or not.
    #[must_use]
    pub fn attempt(&self, index: usize) -> Option<&Attempt> {
        self.attempts.get(index)
    }

    fn current_attempt(&self) -> &Attempt {
        &self.attempts[self.current]
    }

    /// Snapshot for progress displays.
    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        let answered = self.attempts.iter().filter(|a| a.is_submitted()).count();
        ExamProgress {
            total: self.questions.len(),
            answered,
            remaining: self.questions.len() - answered,
            current_index: self.current,
            is_complete: self.is_complete(),
        }
    }

    /// Final outcome, available once the session is complete.
    #[must_use]
    pub fn outcome(&self) -> Option<ExamOutcome> {
        self.completed_at?;
        let total = self.questions.len();
        let pct = percent(self.score as usize, total);
        Some(ExamOutcome {
            score: self.score,
            total_questions: total as u32,
            percent: pct,
            passed: pct >= self.passing_percent,
        })
    }

    /// Toggle or set the selection for the current question.
    ///
    /// Single-select questions keep exactly one option: selecting replaces
    /// any prior choice. Multi-select questions toggle membership of the
    /// given option.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Completed` on a finished session,
    /// `ExamError::AlreadySubmitted` once the current answer is locked,
    /// and `ExamError::UnknownOption` for an id the question does not
    /// offer.
    pub fn select(&mut self, option: OptionId) -> Result<(), ExamError> {
        if self.is_complete() {
            return Err(ExamError::Completed);
        }
        if self.current_attempt().submitted {
            return Err(ExamError::AlreadySubmitted);
        }

        let question = &self.questions[self.current];
        if !question.options().iter().any(|o| o.id == option) {
            return Err(ExamError::UnknownOption(option));
        }

        let kind = question.kind();
        let attempt = &mut self.attempts[self.current];
        match kind {
            QuestionKind::Single => {
                attempt.selected.clear();
                attempt.selected.insert(option);
            }
            QuestionKind::Multiple => {
                if !attempt.selected.remove(&option) {
                    attempt.selected.insert(option);
                }
            }
        }
        Ok(())
    }

    /// Lock in the current selection and reveal correctness.
    ///
    /// A correct answer adds one to the running score.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoSelection` for an empty selection (the
    /// session is unchanged and the caller re-prompts),
    /// `ExamError::AlreadySubmitted` on a double submit, and
    /// `ExamError::Completed` on a finished session.
    pub fn submit(&mut self) -> Result<SubmitResult, ExamError> {
        if self.is_complete() {
            return Err(ExamError::Completed);
        }
        if self.current_attempt().submitted {
            return Err(ExamError::AlreadySubmitted);
        }
        if self.current_attempt().selected.is_empty() {
            return Err(ExamError::NoSelection);
        }

        let question = &self.questions[self.current];
        let correct = question.evaluate(&self.attempts[self.current].selected);
        let explanation = question.explanation().map(str::to_owned);

        let attempt = &mut self.attempts[self.current];
        attempt.submitted = true;
        attempt.correct = correct;
        if correct {
            self.score += 1;
        }

        Ok(SubmitResult {
            correct,
            explanation,
        })
    }

    /// Move past the current (submitted) question.
    ///
    /// On the last question this completes the session, stamping
    /// `completed_at` with `now` and yielding the final outcome.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotSubmitted` while the current answer is not
    /// locked, or `ExamError::Completed` on a finished session.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<ExamStep, ExamError> {
        if self.is_complete() {
            return Err(ExamError::Completed);
        }
        if !self.current_attempt().submitted {
            return Err(ExamError::NotSubmitted);
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(ExamStep::Question(self.current))
        } else {
            self.completed_at = Some(now);
            let outcome = self.outcome().ok_or(ExamError::NotCompleted)?;
            Ok(ExamStep::Completed(outcome))
        }
    }

    /// Step back to the previous question without altering the score.
    ///
    /// The earlier question keeps whatever state it was left in; a
    /// submitted attempt stays revealed via [`ExamSession::attempt`].
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AtFirstQuestion` at index 0, or
    /// `ExamError::Completed` on a finished session.
    pub fn back(&mut self) -> Result<usize, ExamError> {
        if self.is_complete() {
            return Err(ExamError::Completed);
        }
        if self.current == 0 {
            return Err(ExamError::AtFirstQuestion);
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// Discard all attempts and score and re-enter at the first question.
    ///
    /// Permitted on a completed session, and as a no-op on a session with
    /// no recorded state yet, so repeated invocation is safe.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotCompleted` mid-session.
    pub fn restart(&mut self, now: DateTime<Utc>) -> Result<(), ExamError> {
        if !self.is_complete() && !self.is_pristine() {
            return Err(ExamError::NotCompleted);
        }

        self.attempts = vec![Attempt::default(); self.questions.len()];
        self.current = 0;
        self.score = 0;
        self.started_at = now;
        self.completed_at = None;
        Ok(())
    }

    fn is_pristine(&self) -> bool {
        self.current == 0
            && self.score == 0
            && self
                .attempts
                .iter()
                .all(|a| !a.submitted && a.selected.is_empty())
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("quiz_id", &self.quiz_id)
            .field("kind", &self.kind)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("passing_percent", &self.passing_percent)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
