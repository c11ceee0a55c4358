use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ItemId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("content item title cannot be empty")]
    EmptyTitle,

    #[error("content item {0} is locked")]
    Locked(ItemId),
}

//
// ─── CONTENT KIND ──────────────────────────────────────────────────────────────
//

/// The kind of learning material an item carries.
///
/// A quiz item references the question bank that backs it, so chapter
/// quizzes can be started from the item alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Video,
    Text,
    Quiz(QuizId),
    Assignment,
}

impl ContentKind {
    /// Returns the quiz id for quiz items, `None` otherwise.
    #[must_use]
    pub fn quiz_id(&self) -> Option<QuizId> {
        match self {
            ContentKind::Quiz(id) => Some(*id),
            _ => None,
        }
    }
}

//
// ─── CONTENT ITEM ──────────────────────────────────────────────────────────────
//

/// The smallest learning unit inside a lesson.
///
/// `duration` is a display string (e.g. "12:30") and carries no meaning for
/// progression logic. `completed` and `locked` only change through the
/// explicit transitions below; an external unlock policy decides *when* to
/// call `unlock`, this type only enforces that a locked item cannot be
/// completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    id: ItemId,
    title: String,
    kind: ContentKind,
    duration: String,
    completed: bool,
    locked: bool,
}

impl ContentItem {
    /// Create an unlocked, not-yet-completed item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyTitle` if the title is blank.
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        kind: ContentKind,
        duration: impl Into<String>,
    ) -> Result<Self, ItemError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ItemError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            kind,
            duration: duration.into(),
            completed: false,
            locked: false,
        })
    }

    /// Same as `new`, but the item starts locked.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyTitle` if the title is blank.
    pub fn new_locked(
        id: ItemId,
        title: impl Into<String>,
        kind: ContentKind,
        duration: impl Into<String>,
    ) -> Result<Self, ItemError> {
        let mut item = Self::new(id, title, kind, duration)?;
        item.locked = true;
        Ok(item)
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Mark the item as completed.
    ///
    /// Idempotent for already-completed items.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Locked` if the item is still locked.
    pub fn mark_completed(&mut self) -> Result<(), ItemError> {
        if self.locked {
            return Err(ItemError::Locked(self.id));
        }
        self.completed = true;
        Ok(())
    }

    /// Clear the lock flag.
    ///
    /// This is the surface the external unlock policy calls through; the
    /// core never clears the flag on its own.
    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
