//! Round controller: drives the model, dispatches requested tools, and
//! decides when to stop.

use super::transcript::{ToolResultRecord, Transcript};
use crate::error::{PensumError, Result};
use crate::model::{ModelClient, ModelResponse, StopReason};
use crate::tools::{Source, ToolRegistry, ToolSchema};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default system prompt for the course assistant.
const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an assistant for course materials and educational content, with two tools for looking up course information.

Available tools:
1. search_course_content: searches specific course content and detailed materials
2. get_course_syllabus: retrieves a course syllabus (title, instructor, link, complete lesson list)

Tool usage:
- Course syllabus or overview questions: use get_course_syllabus
- Course content questions: use search_course_content
- Up to two sequential rounds of tool calls are supported; a follow-up call may build on the first round's results
- Synthesize tool results into accurate, fact-based answers
- If a tool yields no results, state that clearly without offering alternatives

Response protocol:
- General knowledge questions: answer from existing knowledge without using tools
- Provide direct answers only. No reasoning process, tool explanations, or mentions of search results
- Keep answers brief, clear, and educational, with examples where they aid understanding"#;

/// Separator under which prior conversation text is appended to the prompt.
const HISTORY_HEADER: &str = "Previous conversation:";

/// Default number of tool-enabled rounds.
const DEFAULT_MAX_ROUNDS: usize = 2;

/// Control state for one orchestration call.
///
/// Transitions are driven by the model's stop reason and the round index;
/// `Done` is terminal and holds the response carrying the answer text.
enum Phase {
    AwaitModel,
    DispatchTools(ModelResponse),
    ForcedFinal,
    Done(ModelResponse),
}

/// Agent that answers questions about course materials, letting the model run
/// bounded rounds of local tool lookups before its final answer.
pub struct Agent {
    model: Arc<dyn ModelClient>,
    system_prompt: String,
    max_rounds: usize,
}

impl Agent {
    /// Create an agent over the given model client.
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            model,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Set the maximum number of tool-enabled rounds (at least 1).
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Answer a query, optionally threading prior conversation text and a
    /// tool registry for the model to draw on.
    ///
    /// At most `max_rounds` tool-enabled model calls are made, followed by at
    /// most one forced tool-free call, so total model calls never exceed
    /// `max_rounds + 1`. Tool failures are folded into the transcript as
    /// text; model failures propagate to the caller unmodified.
    #[instrument(skip(self, history, registry), fields(query = %query))]
    pub async fn respond(
        &self,
        query: &str,
        history: Option<&str>,
        mut registry: Option<&mut ToolRegistry>,
    ) -> Result<AgentResponse> {
        let instruction = match history {
            Some(history) => format!("{}\n\n{}\n{}", self.system_prompt, HISTORY_HEADER, history),
            None => self.system_prompt.clone(),
        };

        let catalog: Vec<ToolSchema> = registry.as_ref().map(|r| r.catalog()).unwrap_or_default();
        let offered: Option<&[ToolSchema]> = (!catalog.is_empty()).then_some(catalog.as_slice());

        let mut transcript = Transcript::new(query);
        let mut rounds = 0usize;
        let mut phase = Phase::AwaitModel;

        let response = loop {
            phase = match phase {
                Phase::AwaitModel => {
                    let response = self.model.send(&instruction, &transcript, offered).await?;
                    if registry.is_some() && wants_tools(&response) {
                        Phase::DispatchTools(response)
                    } else {
                        Phase::Done(response)
                    }
                }

                Phase::DispatchTools(mut response) => match registry.as_mut() {
                    // Unreachable by construction; kept total so the state
                    // machine has no panicking transition.
                    None => Phase::Done(response),
                    Some(reg) => {
                        rounds += 1;
                        let requests = std::mem::take(&mut response.tool_requests);
                        transcript.push_assistant(response.text.take(), requests.clone());

                        let mut results = Vec::with_capacity(requests.len());
                        for request in &requests {
                            debug!("Round {}: executing tool {}", rounds, request.name);
                            let content = reg.execute(&request.name, &request.params).await;
                            results.push(ToolResultRecord {
                                request_id: request.id.clone(),
                                content,
                            });
                        }
                        transcript.push_tool_results(results);

                        if rounds >= self.max_rounds {
                            Phase::ForcedFinal
                        } else {
                            Phase::AwaitModel
                        }
                    }
                },

                // The round cap is spent; one last call with tools withheld
                // forces a textual answer.
                Phase::ForcedFinal => {
                    let response = self.model.send(&instruction, &transcript, None).await?;
                    Phase::Done(response)
                }

                Phase::Done(response) => break response,
            };
        };

        let answer = final_text(response)?;
        let sources = registry.map(|r| r.drain_sources()).unwrap_or_default();

        info!("Answered after {} tool round(s)", rounds);

        Ok(AgentResponse {
            answer,
            sources,
            rounds,
        })
    }
}

/// Whether a response opens a tool round.
fn wants_tools(response: &ModelResponse) -> bool {
    response.stop_reason == StopReason::ToolRequest && !response.tool_requests.is_empty()
}

/// Extract the answer text from a terminal response.
fn final_text(response: ModelResponse) -> Result<String> {
    response
        .text
        .ok_or_else(|| PensumError::Model("Model returned an empty response".to_string()))
}

/// Response from one orchestration call.
///
/// Citations are drained from the registry before returning, so they are
/// owned by exactly one call.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final answer text.
    pub answer: String,
    /// Citations accumulated by the call's search executions.
    pub sources: Vec<Source>,
    /// Number of tool rounds that ran.
    pub rounds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ToolRequest;
    use crate::tools::{Tool, ToolOutput};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// What the scripted model saw at one call.
    struct CallRecord {
        instruction: String,
        transcript: Transcript,
        tools_offered: bool,
    }

    /// Model client that replays a fixed script and records each call.
    struct ScriptedModel {
        script: Mutex<VecDeque<Result<ModelResponse>>>,
        calls: Mutex<Vec<CallRecord>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<Result<ModelResponse>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> (usize, bool) {
            let calls = self.calls.lock().unwrap();
            (calls[index].transcript.len(), calls[index].tools_offered)
        }

        fn transcript_at(&self, index: usize) -> Transcript {
            self.calls.lock().unwrap()[index].transcript.clone()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn send(
            &self,
            instruction: &str,
            transcript: &Transcript,
            tools: Option<&[ToolSchema]>,
        ) -> Result<ModelResponse> {
            self.calls.lock().unwrap().push(CallRecord {
                instruction: instruction.to_string(),
                transcript: transcript.clone(),
                tools_offered: tools.is_some(),
            });
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PensumError::Model("Script exhausted".to_string())))
        }
    }

    /// Tool that counts executions, echoes its parameters, and cites.
    struct ProbeTool {
        executions: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for ProbeTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "search_course_content".to_string(),
                description: "Probe".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, params: &Value) -> Result<ToolOutput> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            Ok(ToolOutput::with_sources(
                format!("probe: {}", params),
                vec![Source {
                    text: "Introduction to MCP - Lesson 1".to_string(),
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
                name: "search_course_content".to_string(),
                description: "Always fails".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _params: &Value) -> Result<ToolOutput> {
            Err(PensumError::Store("Database connection error".to_string()))
        }
    }

    fn probe_registry() -> (ToolRegistry, Arc<AtomicUsize>) {
        let executions = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(ProbeTool {
                executions: executions.clone(),
            }))
            .unwrap();
        (registry, executions)
    }

    fn search_request(id: &str) -> ToolRequest {
        ToolRequest {
            id: id.to_string(),
            name: "search_course_content".to_string(),
            params: json!({"query": "MCP"}),
        }
    }

    fn tool_round(ids: &[&str]) -> Result<ModelResponse> {
        Ok(ModelResponse::tool_requests(
            ids.iter().map(|id| search_request(id)).collect(),
        ))
    }

    #[tokio::test]
    async fn test_no_tools_is_a_single_call() {
        let model = ScriptedModel::new(vec![Ok(ModelResponse::text("Paris"))]);
        let agent = Agent::new(model.clone());

        let response = agent.respond("What is X?", None, None).await.unwrap();

        assert_eq!(response.answer, "Paris");
        assert_eq!(response.rounds, 0);
        assert!(response.sources.is_empty());
        assert_eq!(model.call_count(), 1);
        assert!(!model.call(0).1, "no catalog means no tools offered");
    }

    #[tokio::test]
    async fn test_tool_free_first_response_short_circuits() {
        let model = ScriptedModel::new(vec![Ok(ModelResponse::text("From knowledge"))]);
        let agent = Agent::new(model.clone());
        let (mut registry, executions) = probe_registry();

        let response = agent
            .respond("What is X?", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.answer, "From knowledge");
        assert_eq!(model.call_count(), 1);
        assert_eq!(executions.load(Ordering::SeqCst), 0);
        assert!(model.call(0).1, "tools were offered on round 1");
    }

    #[tokio::test]
    async fn test_one_tool_round_then_answer() {
        let model = ScriptedModel::new(vec![
            tool_round(&["call_1"]),
            Ok(ModelResponse::text("MCP is Model Context Protocol.")),
        ]);
        let agent = Agent::new(model.clone());
        let (mut registry, executions) = probe_registry();

        let response = agent
            .respond("What is MCP?", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.answer, "MCP is Model Context Protocol.");
        assert_eq!(response.rounds, 1);
        assert_eq!(model.call_count(), 2);
        assert_eq!(executions.load(Ordering::SeqCst), 1);

        // Second call sees user, assistant tool-request, tool-result.
        let (len, tools_offered) = model.call(1);
        assert_eq!(len, 3);
        assert!(tools_offered, "round 2 still has tools enabled");

        // Citations come back with the answer and the registry is drained.
        assert_eq!(response.sources.len(), 1);
        assert!(registry.drain_sources().is_empty());
    }

    #[tokio::test]
    async fn test_two_rounds_then_forced_final() {
        let model = ScriptedModel::new(vec![
            tool_round(&["call_1"]),
            tool_round(&["call_2"]),
            Ok(ModelResponse::text("Final answer")),
        ]);
        let agent = Agent::new(model.clone());
        let (mut registry, executions) = probe_registry();

        let response = agent
            .respond("Complex question", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.answer, "Final answer");
        assert_eq!(response.rounds, 2);
        assert_eq!(model.call_count(), 3);
        assert_eq!(executions.load(Ordering::SeqCst), 2);

        // The forced call has tools withheld and sees the full transcript:
        // user, (assistant, tool-result) x 2.
        let (len, tools_offered) = model.call(2);
        assert_eq!(len, 5);
        assert!(!tools_offered);
    }

    #[tokio::test]
    async fn test_model_calls_never_exceed_max_rounds_plus_one() {
        let model = ScriptedModel::new(vec![
            tool_round(&["call_1"]),
            tool_round(&["call_2"]),
            tool_round(&["call_3"]),
            Ok(ModelResponse::text("Done")),
        ]);
        let agent = Agent::new(model.clone()).with_max_rounds(3);
        let (mut registry, _) = probe_registry();

        let response = agent
            .respond("Question", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.answer, "Done");
        assert_eq!(model.call_count(), 4);
        assert!(!model.call(3).1, "the fourth call is tool-free");
    }

    #[tokio::test]
    async fn test_tool_failure_is_absorbed_and_round_two_proceeds() {
        let model = ScriptedModel::new(vec![
            tool_round(&["call_1"]),
            Ok(ModelResponse::text("I could not look that up.")),
        ]);
        let agent = Agent::new(model.clone());
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(FailingTool)).unwrap();

        let response = agent
            .respond("Question", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.answer, "I could not look that up.");

        // The failure went into the transcript as ordinary result text.
        let transcript = model.transcript_at(1);
        match &transcript.turns()[2] {
            crate::agent::Turn::ToolResults(results) => {
                assert_eq!(results.len(), 1);
                assert!(results[0].content.contains("Database connection error"));
            }
            other => panic!("Expected tool-result turn, got {}", other.role()),
        }
    }

    #[tokio::test]
    async fn test_results_match_request_order() {
        let model = ScriptedModel::new(vec![
            tool_round(&["call_a", "call_b", "call_c"]),
            Ok(ModelResponse::text("Done")),
        ]);
        let agent = Agent::new(model.clone());
        let (mut registry, executions) = probe_registry();

        agent
            .respond("Question", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(executions.load(Ordering::SeqCst), 3);

        let transcript = model.transcript_at(1);
        match &transcript.turns()[2] {
            crate::agent::Turn::ToolResults(results) => {
                let ids: Vec<_> = results.iter().map(|r| r.request_id.as_str()).collect();
                assert_eq!(ids, vec!["call_a", "call_b", "call_c"]);
            }
            other => panic!("Expected tool-result turn, got {}", other.role()),
        }
    }

    #[tokio::test]
    async fn test_history_is_appended_under_the_header() {
        let model = ScriptedModel::new(vec![Ok(ModelResponse::text("Hi again"))]);
        let agent = Agent::new(model.clone());

        agent
            .respond("Follow-up", Some("User: hello\nAssistant: hi"), None)
            .await
            .unwrap();

        let instruction = model.calls.lock().unwrap()[0].instruction.clone();
        assert!(instruction.contains("Previous conversation:\nUser: hello\nAssistant: hi"));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let model = ScriptedModel::new(vec![Err(PensumError::Model(
            "rate limited".to_string(),
        ))]);
        let agent = Agent::new(model);

        let err = agent.respond("Question", None, None).await.unwrap_err();
        assert!(matches!(err, PensumError::Model(_)));
    }

    #[tokio::test]
    async fn test_tool_stop_reason_with_no_requests_is_terminal() {
        let model = ScriptedModel::new(vec![Ok(ModelResponse {
            stop_reason: StopReason::ToolRequest,
            text: Some("Nothing to do".to_string()),
            tool_requests: Vec::new(),
        })]);
        let agent = Agent::new(model.clone());
        let (mut registry, executions) = probe_registry();

        let response = agent
            .respond("Question", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.answer, "Nothing to do");
        assert_eq!(model.call_count(), 1);
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_max_rounds_is_clamped_to_one() {
        let model = ScriptedModel::new(vec![
            tool_round(&["call_1"]),
            Ok(ModelResponse::text("Done")),
        ]);
        let agent = Agent::new(model.clone()).with_max_rounds(0);
        let (mut registry, _) = probe_registry();

        let response = agent
            .respond("Question", None, Some(&mut registry))
            .await
            .unwrap();

        assert_eq!(response.rounds, 1);
        assert_eq!(model.call_count(), 2);
        assert!(!model.call(1).1, "round cap of 1 forces a tool-free call");
    }
}
