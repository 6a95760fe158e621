//! Tool contract and dispatch registry.
//!
//! Tools expose a name, a machine-readable parameter schema, and a fallible
//! `execute`. The registry makes dispatch total: whatever happens inside a
//! tool, the caller always gets text back, so a failing tool never aborts a
//! round.

mod search;
mod syllabus;

pub use search::CourseSearchTool;
pub use syllabus::CourseSyllabusTool;

use crate::error::{PensumError, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

/// A tool's declared interface, offered to the model for selection.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Name the model uses to invoke the tool.
    pub name: String,
    /// What the tool does and when to use it.
    pub description: String,
    /// JSON schema for the parameters, including the required list.
    pub parameters: Value,
}

/// A provenance record for a piece of retrieved content.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Display text, e.g. "Introduction to MCP - Lesson 1".
    pub text: String,
    /// Link to the cited material, if available.
    pub link: Option<String>,
}

/// Output of one successful tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Textual payload fed back to the model.
    pub text: String,
    /// Citations published by this execution.
    ///
    /// `None` means the tool does not publish sources and the registry's
    /// stored list is left untouched; `Some` replaces it, even when empty.
    pub sources: Option<Vec<Source>>,
}

impl ToolOutput {
    /// Output with no citations.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: None,
        }
    }

    /// Output that publishes citations.
    pub fn with_sources(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            text: text.into(),
            sources: Some(sources),
        }
    }
}

/// Trait for tools the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's declared interface.
    fn schema(&self) -> ToolSchema;

    /// Execute with the given parameter mapping.
    ///
    /// Lookup misses (unknown course, empty results) are ordinary text
    /// output, not errors; `Err` is reserved for actual execution failures.
    async fn execute(&self, params: &Value) -> Result<ToolOutput>;
}

/// Holds named tools, routes invocations to them, and tracks the citations
/// produced by the most recent source-publishing execution.
///
/// `&mut self` on the dispatch path means a registry cannot be shared across
/// overlapping orchestration calls without external synchronization, which
/// keeps one call's unread sources from being clobbered by another.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    last_sources: Vec<Source>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            last_sources: Vec::new(),
        }
    }

    /// Register a tool under the name its schema declares.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.schema().name;
        if name.is_empty() {
            return Err(PensumError::Config(
                "Tool schema must declare a name".to_string(),
            ));
        }

        info!("Registered tool: {}", name);
        self.tools.push(tool);
        Ok(())
    }

    /// Execute a tool by name, always yielding transcript-ready text.
    ///
    /// An unknown name and a failing tool both come back as text so the model
    /// can read and reason about them like any other result.
    pub async fn execute(&mut self, name: &str, params: &Value) -> String {
        let Some(index) = self
            .tools
            .iter()
            .position(|t| t.schema().name == name)
        else {
            warn!("Requested tool not registered: {}", name);
            return format!("Tool '{}' not found", name);
        };

        match self.tools[index].execute(params).await {
            Ok(output) => {
                if let Some(sources) = output.sources {
                    self.last_sources = sources;
                }
                output.text
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                e.to_string()
            }
        }
    }

    /// Declared schemas of all registered tools, in registration order.
    pub fn catalog(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Take the citations from the most recent source-publishing execution,
    /// leaving the registry empty.
    pub fn drain_sources(&mut self) -> Vec<Source> {
        std::mem::take(&mut self.last_sources)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "Echoes its input".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, params: &Value) -> Result<ToolOutput> {
            Ok(ToolOutput::text(params.to_string()))
        }
    }

    struct CitingTool {
        label: &'static str,
    }

    #[async_trait]
    impl Tool for CitingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: format!("cite_{}", self.label),
                description: "Publishes one citation".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _params: &Value) -> Result<ToolOutput> {
            Ok(ToolOutput::with_sources(
                "cited",
                vec![Source {
                    text: self.label.to_string(),
                    link: None,
                }],
            ))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "broken".to_string(),
                description: "Always fails".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _params: &Value) -> Result<ToolOutput> {
            Err(PensumError::Store("Database connection error".to_string()))
        }
    }

    struct NamelessTool;

    #[async_trait]
    impl Tool for NamelessTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: String::new(),
                description: "No name".to_string(),
                parameters: json!({}),
            }
        }

        async fn execute(&self, _params: &Value) -> Result<ToolOutput> {
            Ok(ToolOutput::text("unreachable"))
        }
    }

    #[tokio::test]
    async fn test_execute_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();

        let result = registry.execute("echo", &json!({"query": "test"})).await;
        assert_eq!(result, r#"{"query":"test"}"#);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_returns_literal_text() {
        let mut registry = ToolRegistry::new();

        let result = registry.execute("nonexistent_tool", &json!({})).await;
        assert_eq!(result, "Tool 'nonexistent_tool' not found");
    }

    #[tokio::test]
    async fn test_failing_tool_becomes_text() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(FailingTool)).unwrap();

        let result = registry.execute("broken", &json!({})).await;
        assert!(result.contains("Database connection error"));
    }

    #[test]
    fn test_register_without_name_fails() {
        let mut registry = ToolRegistry::new();
        let err = registry.register(Box::new(NamelessTool)).unwrap_err();
        assert!(matches!(err, PensumError::Config(_)));
    }

    #[test]
    fn test_catalog_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        registry
            .register(Box::new(CitingTool { label: "first" }))
            .unwrap();

        let names: Vec<_> = registry.catalog().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo", "cite_first"]);
    }

    #[tokio::test]
    async fn test_drain_sources_is_destructive() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(CitingTool { label: "first" }))
            .unwrap();

        registry.execute("cite_first", &json!({})).await;

        let sources = registry.drain_sources();
        assert_eq!(sources.len(), 1);
        assert!(registry.drain_sources().is_empty());
    }

    #[tokio::test]
    async fn test_non_citing_tool_leaves_sources_untouched() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(CitingTool { label: "first" }))
            .unwrap();
        registry.register(Box::new(EchoTool)).unwrap();

        registry.execute("cite_first", &json!({})).await;
        registry.execute("echo", &json!({})).await;

        let sources = registry.drain_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].text, "first");
    }

    #[tokio::test]
    async fn test_second_citing_execution_replaces_sources() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(CitingTool { label: "first" }))
            .unwrap();
        registry
            .register(Box::new(CitingTool { label: "second" }))
            .unwrap();

        registry.execute("cite_first", &json!({})).await;
        registry.execute("cite_second", &json!({})).await;

        let sources = registry.drain_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].text, "second");
    }
}
