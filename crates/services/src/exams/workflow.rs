use rand::seq::SliceRandom;
use std::sync::Arc;

use course_core::model::{Course, ItemId, LearnerId, QuizQuestion};
use course_core::progress::can_take_final_exam;
use course_core::Clock;
use storage::repository::{ExamKind, ExamResultRecord, QuizRepository, ResultRecorder};

use super::session::{DEFAULT_PASSING_PERCENT, ExamOutcome, ExamSession};
use crate::error::ExamError;

/// Orchestrates exam starts, the final-exam gate, and result hand-off.
///
/// Sessions themselves stay caller-owned; this service only constructs
/// them from the question banks and ships finished outcomes to the
/// recorder.
#[derive(Clone)]
pub struct ExamWorkflow {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRecorder>,
    shuffle_questions: bool,
}

impl ExamWorkflow {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRecorder>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            results,
            shuffle_questions: false,
        }
    }

    /// Enable or disable shuffling of question order per session.
    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle: bool) -> Self {
        self.shuffle_questions = shuffle;
        self
    }

    /// Start the quiz behind a chapter's quiz content item.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::ItemNotFound` for an unknown item,
    /// `ExamError::NotQuizItem` when the item carries no quiz,
    /// `ExamError::LockedItem` while the item is locked, and storage or
    /// empty-quiz errors from session construction.
    pub async fn start_chapter_quiz(
        &self,
        course: &Course,
        item_id: ItemId,
    ) -> Result<ExamSession, ExamError> {
        let item = course
            .find_item(item_id)
            .ok_or(ExamError::ItemNotFound(item_id))?;
        let quiz_id = item
            .kind()
            .quiz_id()
            .ok_or(ExamError::NotQuizItem(item_id))?;
        if item.is_locked() {
            return Err(ExamError::LockedItem(item_id));
        }

        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        let questions = self.arrange(quiz.into_questions());
        ExamSession::new(
            quiz_id,
            ExamKind::ChapterQuiz,
            questions,
            DEFAULT_PASSING_PERCENT,
            self.clock.now(),
        )
    }

    /// Start the course-wide final exam at the default pass mark.
    ///
    /// # Errors
    ///
    /// See [`ExamWorkflow::start_final_exam_with_threshold`].
    pub async fn start_final_exam(&self, course: &Course) -> Result<ExamSession, ExamError> {
        self.start_final_exam_with_threshold(course, DEFAULT_PASSING_PERCENT)
            .await
    }

    /// Start the course-wide final exam with a caller-provided pass mark.
    ///
    /// The gate: every chapter's content (its quizzes included) must be
    /// completed before the final exam opens.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoFinalExam` if the course declares none,
    /// `ExamError::NotEligible` while any chapter is incomplete, and
    /// storage or empty-quiz errors from session construction.
    pub async fn start_final_exam_with_threshold(
        &self,
        course: &Course,
        passing_percent: u8,
    ) -> Result<ExamSession, ExamError> {
        let quiz_id = course.final_exam().ok_or(ExamError::NoFinalExam)?;
        if !can_take_final_exam(course) {
            return Err(ExamError::NotEligible);
        }

        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        let questions = self.arrange(quiz.into_questions());
        ExamSession::new(
            quiz_id,
            ExamKind::FinalExam,
            questions,
            passing_percent,
            self.clock.now(),
        )
    }

    /// Hand a completed session's outcome to the result recorder.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotCompleted` for a session still in flight,
    /// or `ExamError::Storage` if the recorder fails.
    pub async fn record_outcome(
        &self,
        session: &ExamSession,
        learner_id: LearnerId,
    ) -> Result<ExamResultRecord, ExamError> {
        let outcome = session.outcome().ok_or(ExamError::NotCompleted)?;
        let completed_at = session.completed_at().ok_or(ExamError::NotCompleted)?;

        let record = ExamResultRecord {
            learner_id,
            quiz_id: session.quiz_id(),
            kind: session.kind(),
            score: outcome.score,
            total_questions: outcome.total_questions,
            percent: outcome.percent,
            passed: outcome.passed,
            completed_at,
        };
        self.results.record_result(&record).await?;
        Ok(record)
    }

    /// Mark a chapter's quiz item completed after a passing outcome.
    ///
    /// A failed outcome leaves the item untouched; the learner restarts
    /// the quiz instead. Returns the refreshed course progress.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Course` if the item is missing or locked.
    pub fn complete_quiz_item(
        &self,
        course: &mut Course,
        item_id: ItemId,
        outcome: &ExamOutcome,
    ) -> Result<u8, ExamError> {
        if outcome.passed {
            course.mark_item_completed(item_id)?;
        }
        Ok(course.progress_percent())
    }

    fn arrange(&self, mut questions: Vec<QuizQuestion>) -> Vec<QuizQuestion> {
        if self.shuffle_questions {
            questions.shuffle(&mut rand::rng());
        }
        questions
    }
}
