//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{CourseError, ItemId, OptionId};
use storage::repository::StorageError;

/// Errors emitted by exam sessions and the exam workflow.
///
/// The only user-facing reject in the whole engine is `NoSelection` (a
/// submit with nothing selected); the UI re-prompts and the session is
/// unchanged. The state-transition variants (`NotSubmitted`,
/// `AlreadySubmitted`, `Completed`, `NotCompleted`, `AtFirstQuestion`)
/// signal caller bugs and are surfaced as explicit errors rather than
/// recovered from silently.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("no questions available for this exam")]
    Empty,

    #[error("cannot submit without a selected answer")]
    NoSelection,

    #[error("current question was already submitted")]
    AlreadySubmitted,

    #[error("current question was not submitted yet")]
    NotSubmitted,

    #[error("exam session already completed")]
    Completed,

    #[error("exam session is not completed")]
    NotCompleted,

    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("option {0} does not belong to the current question")]
    UnknownOption(OptionId),

    #[error("content item {0} is not a quiz")]
    NotQuizItem(ItemId),

    #[error("quiz item {0} is still locked")]
    LockedItem(ItemId),

    #[error("content item {0} not found in course")]
    ItemNotFound(ItemId),

    #[error("not all chapter quizzes are completed")]
    NotEligible,

    #[error("course declares no final exam")]
    NoFinalExam,

    #[error(transparent)]
    Course(#[from] CourseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
