//! Append-only conversation transcript for one orchestration call.

use crate::model::ToolRequest;

/// Result of executing one requested tool.
///
/// The content is either the tool's output or a textual error description;
/// the transcript does not distinguish the two, so the model reads failures
/// the same way it reads real content.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResultRecord {
    /// Id of the request this result answers.
    pub request_id: String,
    /// Textual payload fed back to the model.
    pub content: String,
}

/// One turn in the conversation.
#[derive(Debug, Clone)]
pub enum Turn {
    /// The original user query.
    User(String),
    /// An assistant turn carrying tool requests (and any interim text).
    Assistant {
        text: Option<String>,
        requests: Vec<ToolRequest>,
    },
    /// The results for one round of tool requests, in request order.
    ToolResults(Vec<ToolResultRecord>),
}

impl Turn {
    /// Role label for this turn.
    pub fn role(&self) -> &'static str {
        match self {
            Turn::User(_) => "user",
            Turn::Assistant { .. } => "assistant",
            Turn::ToolResults(_) => "tool-result",
        }
    }
}

/// The ordered exchange passed to each model call.
///
/// Always begins with exactly one user turn; turns are strictly appended and
/// never mutated or reordered. Owned by a single orchestration call and
/// discarded when it returns.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Start a transcript with the user's query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::User(query.into())],
        }
    }

    /// Append an assistant turn carrying tool requests.
    pub fn push_assistant(&mut self, text: Option<String>, requests: Vec<ToolRequest>) {
        self.turns.push(Turn::Assistant { text, requests });
    }

    /// Append the results for one round of tool execution.
    ///
    /// Skipped entirely when the round produced no results, so a round that
    /// requested zero tools leaves no tool-result turn behind.
    pub fn push_tool_results(&mut self, results: Vec<ToolResultRecord>) {
        if !results.is_empty() {
            self.turns.push(Turn::ToolResults(results));
        }
    }

    /// Read-only view of the turns.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns recorded so far.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// A transcript is never empty; this exists for completeness.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
