//! In-memory course store with lexical ranking.
//!
//! Stands in for an external vector backend: passages are ranked by term
//! overlap with the query instead of embedding similarity. Suitable for
//! small corpora, demos, and tests.

use super::{CourseHit, CourseMeta, CourseStore};
use crate::error::{PensumError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One passage of course content as stored in the corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePassage {
    /// Passage text.
    pub content: String,
    /// Lesson the passage belongs to, if known.
    pub lesson_number: Option<u32>,
}

/// One course with its metadata and content passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEntry {
    #[serde(flatten)]
    pub meta: CourseMeta,
    /// Content passages in course order.
    #[serde(default)]
    pub passages: Vec<CoursePassage>,
}

/// In-memory course store.
pub struct MemoryCourseStore {
    courses: Vec<CourseEntry>,
    max_results: usize,
}

impl MemoryCourseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            courses: Vec::new(),
            max_results: 5,
        }
    }

    /// Set the maximum number of search results.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Add a course to the store.
    pub fn add_course(&mut self, course: CourseEntry) {
        self.courses.push(course);
    }

    /// Load a corpus from a JSON file (an array of course entries).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PensumError::Store(format!("Failed to read corpus {}: {}", path.display(), e))
        })?;
        let courses: Vec<CourseEntry> = serde_json::from_str(&content)?;
        info!("Loaded {} course(s) from {}", courses.len(), path.display());

        Ok(Self {
            courses,
            max_results: 5,
        })
    }

    /// Number of courses in the store.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    fn resolve(&self, name: &str) -> Option<String> {
        let needle = name.to_lowercase();

        // Exact match first, then substring in either direction.
        if let Some(course) = self
            .courses
            .iter()
            .find(|c| c.meta.title.to_lowercase() == needle)
        {
            return Some(course.meta.title.clone());
        }

        self.courses
            .iter()
            .find(|c| {
                let title = c.meta.title.to_lowercase();
                title.contains(&needle) || needle.contains(&title)
            })
            .map(|c| c.meta.title.clone())
    }
}

impl Default for MemoryCourseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<Vec<CourseHit>> {
        // Resolve the course filter up front; an unresolvable name is a miss,
        // not an error.
        let course_filter = match course_name {
            Some(name) => match self.resolve(name) {
                Some(title) => Some(title),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<CourseHit> = Vec::new();
        for course in &self.courses {
            if let Some(ref title) = course_filter {
                if &course.meta.title != title {
                    continue;
                }
            }

            for passage in &course.passages {
                if let Some(lesson) = lesson_number {
                    if passage.lesson_number != Some(lesson) {
                        continue;
                    }
                }

                let score = overlap_score(&query_terms, &passage.content);
                if score > 0.0 {
                    scored.push(CourseHit {
                        content: passage.content.clone(),
                        course_title: course.meta.title.clone(),
                        lesson_number: passage.lesson_number,
                        distance: 1.0 - score,
                    });
                }
            }
        }

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(self.max_results);

        Ok(scored)
    }

    async fn resolve_course_name(&self, name: &str) -> Result<Option<String>> {
        Ok(self.resolve(name))
    }

    async fn get_lesson_link(
        &self,
        course_title: &str,
        lesson_number: u32,
    ) -> Result<Option<String>> {
        Ok(self
            .courses
            .iter()
            .find(|c| c.meta.title == course_title)
            .and_then(|c| c.meta.lessons.iter().find(|l| l.number == lesson_number))
            .and_then(|l| l.link.clone()))
    }

    async fn get_all_courses_metadata(&self) -> Result<Vec<CourseMeta>> {
        Ok(self.courses.iter().map(|c| c.meta.clone()).collect())
    }
}

/// Lowercase alphanumeric terms of a text.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Fraction of query terms present in the passage.
fn overlap_score(query_terms: &[String], content: &str) -> f32 {
    let content_terms = tokenize(content);
    let matched = query_terms
        .iter()
        .filter(|t| content_terms.contains(t))
        .count();

    matched as f32 / query_terms.len() as f32
}
