//! Courses listing command.

use super::load_store;
use crate::cli::Output;
use crate::config::Settings;
use crate::store::CourseStore;
use anyhow::Result;

/// Run the courses command.
pub async fn run_courses(corpus: Option<&str>, settings: Settings) -> Result<()> {
    let store = load_store(&settings, corpus)?;
    let metadata = store.get_all_courses_metadata().await?;

    if metadata.is_empty() {
        Output::info("No courses in the corpus.");
        return Ok(());
    }

    Output::header(&format!("Courses ({})", metadata.len()));
    for course in &metadata {
        let detail = match &course.instructor {
            Some(instructor) => format!(
                "{} ({}, {} lessons)",
                course.title,
                instructor,
                course.lessons.len()
            ),
            None => format!("{} ({} lessons)", course.title, course.lessons.len()),
        };
        Output::list_item(&detail);
    }

    Ok(())
}
