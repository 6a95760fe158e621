//! OpenAI chat-completions adapter for the model client boundary.

use super::{ModelClient, ModelResponse, StopReason, ToolRequest};
use crate::agent::{Transcript, Turn};
use crate::error::{PensumError, Result};
use crate::tools::ToolSchema;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default timeout for model API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Model client backed by the OpenAI chat completions API.
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiModel {
    /// Create a client for the given model with the default request timeout.
    pub fn new(model: &str) -> Self {
        Self::with_timeout(model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(model: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Client::with_config(OpenAIConfig::default()).with_http_client(http_client),
            model: model.to_string(),
            temperature: 0.0,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_messages(
        &self,
        instruction: &str,
        transcript: &Transcript,
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instruction.to_string())
                .build()
                .map_err(|e| PensumError::Model(e.to_string()))?
                .into(),
        ];

        for turn in transcript.turns() {
            match turn {
                Turn::User(text) => {
                    messages.push(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(text.clone())
                            .build()
                            .map_err(|e| PensumError::Model(e.to_string()))?
                            .into(),
                    );
                }
                Turn::Assistant { text, requests } => {
                    let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                    if let Some(text) = text {
                        builder.content(text.clone());
                    }
                    if !requests.is_empty() {
                        let calls: Vec<ChatCompletionMessageToolCall> =
                            requests.iter().map(to_provider_call).collect();
                        builder.tool_calls(calls);
                    }
                    messages.push(
                        builder
                            .build()
                            .map_err(|e| PensumError::Model(e.to_string()))?
                            .into(),
                    );
                }
                Turn::ToolResults(results) => {
                    // One provider message per result, keeping request order.
                    for result in results {
                        messages.push(
                            ChatCompletionRequestToolMessageArgs::default()
                                .tool_call_id(result.request_id.clone())
                                .content(result.content.clone())
                                .build()
                                .map_err(|e| PensumError::Model(e.to_string()))?
                                .into(),
                        );
                    }
                }
            }
        }

        Ok(messages)
    }
}

#[async_trait]
impl ModelClient for OpenAiModel {
    async fn send(
        &self,
        instruction: &str,
        transcript: &Transcript,
        tools: Option<&[ToolSchema]>,
    ) -> Result<ModelResponse> {
        let messages = self.build_messages(instruction, transcript)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .temperature(self.temperature)
            .messages(messages);

        if let Some(schemas) = tools {
            if !schemas.is_empty() {
                let tools: Vec<ChatCompletionTool> =
                    schemas.iter().map(to_provider_tool).collect();
                builder.tools(tools);
            }
        }

        let request = builder
            .build()
            .map_err(|e| PensumError::Model(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PensumError::Model(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| PensumError::Model("No response from model".to_string()))?;

        // Reduce the provider response to the tagged shape the core depends on.
        match &choice.message.tool_calls {
            Some(calls) if !calls.is_empty() => {
                debug!("Model requested {} tool call(s)", calls.len());
                let requests = calls.iter().map(from_provider_call).collect();
                Ok(ModelResponse {
                    stop_reason: StopReason::ToolRequest,
                    text: choice.message.content.clone(),
                    tool_requests: requests,
                })
            }
            _ => Ok(ModelResponse {
                stop_reason: StopReason::End,
                text: choice.message.content.clone(),
                tool_requests: Vec::new(),
            }),
        }
    }
}

fn to_provider_call(request: &ToolRequest) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: request.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: request.name.clone(),
            arguments: request.params.to_string(),
        },
    }
}

fn from_provider_call(call: &ChatCompletionMessageToolCall) -> ToolRequest {
    // Malformed argument JSON becomes an empty mapping; the tool reports the
    // missing parameters as text and the conversation continues.
    let params: Value =
        serde_json::from_str(&call.function.arguments).unwrap_or_else(|_| Value::Object(Default::default()));

    ToolRequest {
        id: call.id.clone(),
        name: call.function.name.clone(),
        params,
    }
}

fn to_provider_tool(schema: &ToolSchema) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: schema.name.clone(),
            description: Some(schema.description.clone()),
            parameters: Some(schema.parameters.clone()),
            strict: None,
        },
    }
}
