//! Round-bounded tool-calling agent.

mod runner;
pub mod transcript;

pub use runner::{Agent, AgentResponse};
pub use transcript::{ToolResultRecord, Transcript, Turn};
