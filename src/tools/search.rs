//! Course content search tool.

use super::{Source, Tool, ToolOutput, ToolSchema};
use crate::error::{PensumError, Result};
use crate::store::CourseStore;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Searches course content, optionally scoped to a course and/or lesson, and
/// publishes one citation per matched passage.
pub struct CourseSearchTool {
    store: Arc<dyn CourseStore>,
}

impl CourseSearchTool {
    /// Create a search tool over the given store.
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    fn format_hits(
        hits: &[crate::store::CourseHit],
        sources: &mut Vec<Source>,
        links: Vec<Option<String>>,
    ) -> String {
        hits.iter()
            .zip(links)
            .map(|(hit, link)| {
                let header = match hit.lesson_number {
                    Some(lesson) => format!("{} - Lesson {}", hit.course_title, lesson),
                    None => hit.course_title.clone(),
                };
                sources.push(Source {
                    text: header.clone(),
                    link,
                });
                format!("[{}]\n{}", header, hit.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_course_content".to_string(),
            description: "Search course materials for specific content and detailed lesson \
                          material. Use for questions about what a course actually teaches."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title to scope the search to (partial names work)"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Lesson number to scope the search to"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, params: &Value) -> Result<ToolOutput> {
        let query = params["query"]
            .as_str()
            .ok_or_else(|| PensumError::InvalidInput("Missing 'query' parameter".to_string()))?;
        let course_name = params["course_name"].as_str();
        let lesson_number = params["lesson_number"].as_u64().map(|n| n as u32);

        let hits = self.store.search(query, course_name, lesson_number).await?;

        if hits.is_empty() {
            let mut message = "No relevant content found".to_string();
            if let Some(course) = course_name {
                message.push_str(&format!(" in course '{}'", course));
            }
            if let Some(lesson) = lesson_number {
                message.push_str(&format!(" in lesson {}", lesson));
            }
            message.push('.');
            return Ok(ToolOutput::text(message));
        }

        // Look up lesson links so each citation can point at its material.
        let mut links = Vec::with_capacity(hits.len());
        for hit in &hits {
            let link = match hit.lesson_number {
                Some(lesson) => {
                    self.store
                        .get_lesson_link(&hit.course_title, lesson)
                        .await?
                }
                None => None,
            };
            links.push(link);
        }

        let mut sources = Vec::with_capacity(hits.len());
        let text = Self::format_hits(&hits, &mut sources, links);

        Ok(ToolOutput::with_sources(text, sources))
    }
}
