//! CLI command implementations.

mod ask;
mod chat;
mod courses;
mod syllabus;

pub use ask::run_ask;
pub use chat::run_chat;
pub use courses::run_courses;
pub use syllabus::run_syllabus;

use crate::agent::Agent;
use crate::config::Settings;
use crate::error::{PensumError, Result};
use crate::model::OpenAiModel;
use crate::store::MemoryCourseStore;
use crate::tools::{CourseSearchTool, CourseSyllabusTool, ToolRegistry};
use std::path::PathBuf;
use std::sync::Arc;

/// Load the course corpus named by the CLI override or the configuration.
pub(crate) fn load_store(
    settings: &Settings,
    corpus_override: Option<&str>,
) -> Result<Arc<MemoryCourseStore>> {
    let path = corpus_override
        .map(PathBuf::from)
        .or_else(|| settings.corpus_path())
        .ok_or_else(|| {
            PensumError::Config(
                "No course corpus configured. Set retrieval.corpus_path or pass --corpus."
                    .to_string(),
            )
        })?;

    let store = MemoryCourseStore::load(&path)?.with_max_results(settings.retrieval.max_results);
    Ok(Arc::new(store))
}

/// Build a registry with both lookup tools over the given store.
pub(crate) fn build_registry(store: Arc<MemoryCourseStore>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CourseSearchTool::new(store.clone())))?;
    registry.register(Box::new(CourseSyllabusTool::new(store)))?;
    Ok(registry)
}

/// Build the agent from settings and per-command overrides.
pub(crate) fn build_agent(
    settings: &Settings,
    model: Option<String>,
    rounds: Option<usize>,
) -> Result<Agent> {
    let model_name = model.unwrap_or_else(|| settings.model.model.clone());
    let client =
        Arc::new(OpenAiModel::new(&model_name).with_temperature(settings.model.temperature));

    let mut agent =
        Agent::new(client).with_max_rounds(rounds.unwrap_or(settings.model.max_rounds));
    if let Some(prompt) = settings.system_prompt()? {
        agent = agent.with_system_prompt(&prompt);
    }

    Ok(agent)
}
