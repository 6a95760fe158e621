//! Ask command implementation.

use super::{build_agent, build_registry, load_store};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    rounds: Option<usize>,
    corpus: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let store = load_store(&settings, corpus)?;
    let mut registry = build_registry(store)?;
    let agent = build_agent(&settings, model, rounds)?;

    match agent.respond(question, None, Some(&mut registry)).await {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::source(&source.text, source.link.as_deref());
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
