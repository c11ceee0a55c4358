use thiserror::Error;

use crate::model::{CourseError, ItemError, QuizDefinitionError, QuizError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    QuizDefinition(#[from] QuizDefinitionError),
}
