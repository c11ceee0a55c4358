mod progress;
mod session;
mod workflow;

// Public API of the exam subsystem.
pub use crate::error::ExamError;
pub use progress::ExamProgress;
pub use session::{
    Attempt, DEFAULT_PASSING_PERCENT, ExamOutcome, ExamSession, ExamStep, SubmitResult,
};
pub use workflow::ExamWorkflow;
