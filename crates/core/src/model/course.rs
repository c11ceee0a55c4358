use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterId, CourseId, ItemId, LessonId, QuizId};
use crate::model::item::{ContentItem, ItemError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("content item {0} not found in course")]
    ItemNotFound(ItemId),

    #[error(transparent)]
    Item(#[from] ItemError),
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// An ordered group of content items.
///
/// Lessons are containers: item order drives prev/next navigation, but a
/// lesson enforces no completion rule of its own. Quizzes and assignments
/// complete independently of their neighbors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    items: Vec<ContentItem>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        items: Vec<ContentItem>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        Ok(Self { id, title, items })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Id of the item following `current` in lesson order, if any.
    #[must_use]
    pub fn next_item_id(&self, current: ItemId) -> Option<ItemId> {
        let pos = self.items.iter().position(|i| i.id() == current)?;
        self.items.get(pos + 1).map(ContentItem::id)
    }

    /// Id of the item preceding `current` in lesson order, if any.
    #[must_use]
    pub fn prev_item_id(&self, current: ItemId) -> Option<ItemId> {
        let pos = self.items.iter().position(|i| i.id() == current)?;
        pos.checked_sub(1).map(|p| self.items[p].id())
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<ContentItem> {
        &mut self.items
    }
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// An ordered group of lessons.
///
/// Chapter completion is derived on read (see `crate::progress`); nothing
/// here caches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    lessons: Vec<Lesson>,
}

impl Chapter {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: ChapterId,
        title: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        Ok(Self { id, title, lessons })
    }

    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// All content items of the chapter, in lesson order.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.lessons.iter().flat_map(|l| l.items().iter())
    }

    pub(crate) fn lessons_mut(&mut self) -> &mut Vec<Lesson> {
        &mut self.lessons
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// The full Chapter→Lesson→ContentItem tree for one course.
///
/// The tree is owned by the caller for the duration of a viewing session;
/// `progress_percent` is the one cached scalar and is recomputed by the
/// two mutators below, so it can never go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    chapters: Vec<Chapter>,
    final_exam: Option<QuizId>,
    progress_percent: u8,
}

impl Course {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        chapters: Vec<Chapter>,
        final_exam: Option<QuizId>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let mut course = Self {
            id,
            title,
            chapters,
            final_exam,
            progress_percent: 0,
        };
        course.refresh_progress();
        Ok(course)
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn final_exam(&self) -> Option<QuizId> {
        self.final_exam
    }

    /// Aggregate completion percentage, 0–100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// All content items of the course, flattened in chapter/lesson order.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.chapters.iter().flat_map(Chapter::items)
    }

    /// Find a content item anywhere in the tree.
    #[must_use]
    pub fn find_item(&self, id: ItemId) -> Option<&ContentItem> {
        self.items().find(|i| i.id() == id)
    }

    /// Mark a content item completed and refresh the cached progress.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ItemNotFound` if the id is not in the tree,
    /// or `CourseError::Item` if the item is locked.
    pub fn mark_item_completed(&mut self, id: ItemId) -> Result<u8, CourseError> {
        let item = self
            .find_item_mut(id)
            .ok_or(CourseError::ItemNotFound(id))?;
        item.mark_completed()?;
        self.refresh_progress();
        Ok(self.progress_percent)
    }

    /// Clear a content item's lock flag on behalf of the unlock policy.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ItemNotFound` if the id is not in the tree.
    pub fn unlock_item(&mut self, id: ItemId) -> Result<(), CourseError> {
        let item = self
            .find_item_mut(id)
            .ok_or(CourseError::ItemNotFound(id))?;
        item.unlock();
        Ok(())
    }

    fn find_item_mut(&mut self, id: ItemId) -> Option<&mut ContentItem> {
        self.chapters
            .iter_mut()
            .flat_map(Chapter::lessons_mut)
            .flat_map(Lesson::items_mut)
            .find(|i| i.id() == id)
    }

    fn refresh_progress(&mut self) {
        self.progress_percent = crate::progress::course_progress(self);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::ContentKind;

    fn item(id: u64) -> ContentItem {
        ContentItem::new(ItemId::new(id), format!("Item {id}"), ContentKind::Text, "").unwrap()
    }

    fn one_chapter_course(items: Vec<ContentItem>) -> Course {
        let lesson = Lesson::new(LessonId::new(1), "Lesson 1", items).unwrap();
        let chapter = Chapter::new(ChapterId::new(1), "Chapter 1", vec![lesson]).unwrap();
        Course::new(CourseId::new(1), "Course", vec![chapter], None).unwrap()
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(Lesson::new(LessonId::new(1), " ", Vec::new()).is_err());
        assert!(Chapter::new(ChapterId::new(1), "", Vec::new()).is_err());
        assert!(Course::new(CourseId::new(1), "\t", Vec::new(), None).is_err());
    }

    #[test]
    fn marking_item_updates_progress() {
        let mut course = one_chapter_course(vec![item(1), item(2)]);
        assert_eq!(course.progress_percent(), 0);

        let percent = course.mark_item_completed(ItemId::new(1)).unwrap();
        assert_eq!(percent, 50);
        assert_eq!(course.progress_percent(), 50);
    }

    #[test]
    fn marking_unknown_item_fails() {
        let mut course = one_chapter_course(vec![item(1)]);
        let err = course.mark_item_completed(ItemId::new(99)).unwrap_err();
        assert_eq!(err, CourseError::ItemNotFound(ItemId::new(99)));
    }

    #[test]
    fn marking_locked_item_fails_and_progress_is_unchanged() {
        let locked =
            ContentItem::new_locked(ItemId::new(1), "Final quiz", ContentKind::Video, "").unwrap();
        let mut course = one_chapter_course(vec![locked, item(2)]);

        let err = course.mark_item_completed(ItemId::new(1)).unwrap_err();
        assert_eq!(err, CourseError::Item(ItemError::Locked(ItemId::new(1))));
        assert_eq!(course.progress_percent(), 0);
    }

    #[test]
    fn unlock_item_allows_completion() {
        let locked =
            ContentItem::new_locked(ItemId::new(1), "Bonus", ContentKind::Assignment, "").unwrap();
        let mut course = one_chapter_course(vec![locked]);

        course.unlock_item(ItemId::new(1)).unwrap();
        let percent = course.mark_item_completed(ItemId::new(1)).unwrap();
        assert_eq!(percent, 100);
    }

    #[test]
    fn lesson_navigation_follows_item_order() {
        let lesson = Lesson::new(LessonId::new(1), "L", vec![item(1), item(2), item(3)]).unwrap();

        assert_eq!(lesson.next_item_id(ItemId::new(1)), Some(ItemId::new(2)));
        assert_eq!(lesson.next_item_id(ItemId::new(3)), None);
        assert_eq!(lesson.prev_item_id(ItemId::new(2)), Some(ItemId::new(1)));
        assert_eq!(lesson.prev_item_id(ItemId::new(1)), None);
        assert_eq!(lesson.next_item_id(ItemId::new(42)), None);
    }

    #[test]
    fn items_flatten_in_order() {
        let l1 = Lesson::new(LessonId::new(1), "L1", vec![item(1), item(2)]).unwrap();
        let l2 = Lesson::new(LessonId::new(2), "L2", vec![item(3)]).unwrap();
        let c1 = Chapter::new(ChapterId::new(1), "C1", vec![l1]).unwrap();
        let c2 = Chapter::new(ChapterId::new(2), "C2", vec![l2]).unwrap();
        let course = Course::new(CourseId::new(1), "Course", vec![c1, c2], None).unwrap();

        let ids: Vec<u64> = course.items().map(|i| i.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
