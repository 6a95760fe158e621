//! Course retrieval abstraction for Pensum.
//!
//! Provides a trait-based interface to whatever backend holds the course
//! corpus. Embedding computation and vector-index persistence live behind
//! this boundary and are not part of this crate.

mod memory;

pub use memory::MemoryCourseStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A passage of course content matched by a search.
#[derive(Debug, Clone)]
pub struct CourseHit {
    /// Matched passage text.
    pub content: String,
    /// Canonical title of the course the passage belongs to.
    pub course_title: String,
    /// Lesson the passage belongs to, if known.
    pub lesson_number: Option<u32>,
    /// Ranking distance (lower is better).
    pub distance: f32,
}

/// One lesson entry in a course outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonMeta {
    /// Lesson number.
    pub number: u32,
    /// Lesson title.
    pub title: String,
    /// Link to the lesson, if available.
    pub link: Option<String>,
}

/// Metadata describing one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseMeta {
    /// Canonical course title.
    pub title: String,
    /// Instructor name, if known.
    pub instructor: Option<String>,
    /// Link to the course, if available.
    pub link: Option<String>,
    /// Lessons in course order.
    pub lessons: Vec<LessonMeta>,
}

/// Trait for course corpus backends.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Search course content, optionally scoped to a course and/or lesson.
    ///
    /// The course name may be fuzzy; implementations resolve it before
    /// filtering. Results are ranked best-first.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<Vec<CourseHit>>;

    /// Resolve a possibly-fuzzy course name to its canonical title.
    async fn resolve_course_name(&self, name: &str) -> Result<Option<String>>;

    /// Get the link for a specific lesson, if one is recorded.
    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32)
        -> Result<Option<String>>;

    /// Get metadata for every course in the corpus.
    async fn get_all_courses_metadata(&self) -> Result<Vec<CourseMeta>>;
}
