//! Course syllabus lookup tool.

use super::{Tool, ToolOutput, ToolSchema};
use crate::error::{PensumError, Result};
use crate::store::{CourseMeta, CourseStore};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Resolves a possibly-fuzzy course name and renders its syllabus: title,
/// instructor, link, and the full lesson list.
///
/// Publishes no citations; "not found" comes back as plain text so the model
/// can read it like any other result.
pub struct CourseSyllabusTool {
    store: Arc<dyn CourseStore>,
}

impl CourseSyllabusTool {
    /// Create a syllabus tool over the given store.
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    fn format_syllabus(course: &CourseMeta) -> String {
        let mut out = format!("# {}\n", course.title);

        if let Some(instructor) = &course.instructor {
            out.push_str(&format!("\n**Instructor**: {}", instructor));
        }
        if let Some(link) = &course.link {
            out.push_str(&format!("\n**Course link**: {}", link));
        }

        out.push_str("\n\n## Lessons\n");
        if course.lessons.is_empty() {
            out.push_str("No lessons listed.");
        } else {
            let lessons = course
                .lessons
                .iter()
                .map(|l| format!("{}. {}", l.number, l.title))
                .collect::<Vec<_>>()
                .join("\n");
            out.push_str(&lessons);
        }

        out
    }
}

#[async_trait]
impl Tool for CourseSyllabusTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_course_syllabus".to_string(),
            description: "Get a course syllabus: title, instructor, course link, and the \
                          complete lesson list with numbers and titles. Use for course \
                          overview and outline questions."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "Course title to look up (partial names work)"
                    }
                },
                "required": ["course_name"]
            }),
        }
    }

    async fn execute(&self, params: &Value) -> Result<ToolOutput> {
        let course_name = params["course_name"].as_str().ok_or_else(|| {
            PensumError::InvalidInput("Missing 'course_name' parameter".to_string())
        })?;

        let Some(title) = self.store.resolve_course_name(course_name).await? else {
            return Ok(ToolOutput::text(format!(
                "No course found matching '{}'",
                course_name
            )));
        };

        let metadata = self.store.get_all_courses_metadata().await?;
        let Some(course) = metadata.iter().find(|c| c.title == title) else {
            return Ok(ToolOutput::text(format!(
                "No metadata found for course '{}'",
                title
            )));
        };

        Ok(ToolOutput::text(Self::format_syllabus(course)))
    }
}
