#![forbid(unsafe_code)]

pub mod error;
pub mod exams;

pub use course_core::Clock;

pub use error::ExamError;
pub use exams::{
    Attempt, DEFAULT_PASSING_PERCENT, ExamOutcome, ExamProgress, ExamSession, ExamStep,
    ExamWorkflow, SubmitResult,
};
