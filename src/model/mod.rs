//! Model client boundary.
//!
//! The orchestration core only ever sees the minimal tagged response shape
//! defined here; provider-specific response objects are adapted into it at
//! the boundary so provider vocabulary never leaks into the control loop.

mod openai;

pub use openai::OpenAiModel;

use crate::agent::Transcript;
use crate::error::Result;
use crate::tools::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;

/// Why the model stopped producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model is done and its text is the answer.
    End,
    /// The model wants one or more tools executed before continuing.
    ToolRequest,
}

/// A model-issued request to execute a named local tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    /// Opaque provider-assigned id, unique within a round.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Parameter mapping for the tool.
    pub params: Value,
}

/// One model response, reduced to the shape the round controller needs.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub stop_reason: StopReason,
    /// Free text, if any was produced.
    pub text: Option<String>,
    /// Tool requests, in the order the model issued them.
    pub tool_requests: Vec<ToolRequest>,
}

impl ModelResponse {
    /// A plain text response with no tool requests.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            stop_reason: StopReason::End,
            text: Some(text.into()),
            tool_requests: Vec::new(),
        }
    }

    /// A response requesting tool execution.
    pub fn tool_requests(requests: Vec<ToolRequest>) -> Self {
        Self {
            stop_reason: StopReason::ToolRequest,
            text: None,
            tool_requests: requests,
        }
    }
}

/// Trait for model providers.
///
/// One call maps (instruction, transcript, offered tools) to one response.
/// Implementations must not retry internally; upstream failures are surfaced
/// to the caller unmodified.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn send(
        &self,
        instruction: &str,
        transcript: &Transcript,
        tools: Option<&[ToolSchema]>,
    ) -> Result<ModelResponse>;
}
