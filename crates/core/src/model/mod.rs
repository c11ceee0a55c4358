mod course;
mod ids;
mod item;
mod quiz;

pub use ids::{
    ChapterId, CourseId, ItemId, LearnerId, LessonId, OptionId, ParseIdError, QuestionId, QuizId,
};

pub use course::{Chapter, Course, CourseError, Lesson};
pub use item::{ContentItem, ContentKind, ItemError};
pub use quiz::{AnswerOption, QuestionKind, Quiz, QuizDefinitionError, QuizError, QuizQuestion};
