//! Syllabus rendering command.

use super::load_store;
use crate::config::Settings;
use crate::tools::{CourseSyllabusTool, Tool};
use anyhow::Result;
use serde_json::json;

/// Run the syllabus command.
///
/// Goes through the same tool the model uses, so the rendering matches what
/// the assistant sees.
pub async fn run_syllabus(course: &str, corpus: Option<&str>, settings: Settings) -> Result<()> {
    let store = load_store(&settings, corpus)?;
    let tool = CourseSyllabusTool::new(store);

    let output = tool.execute(&json!({ "course_name": course })).await?;
    println!("{}", output.text);

    Ok(())
}
