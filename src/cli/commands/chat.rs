//! Interactive chat command.
//!
//! History lives only in this process: recent exchanges are rendered to text
//! and threaded back through the agent as conversation context.

use super::{build_agent, build_registry, load_store};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Number of recent exchanges kept as context.
const MAX_HISTORY_EXCHANGES: usize = 2;

/// Rolling window of recent question/answer exchanges.
struct History {
    exchanges: VecDeque<(String, String)>,
}

impl History {
    fn new() -> Self {
        Self {
            exchanges: VecDeque::new(),
        }
    }

    fn push(&mut self, question: String, answer: String) {
        self.exchanges.push_back((question, answer));
        while self.exchanges.len() > MAX_HISTORY_EXCHANGES {
            self.exchanges.pop_front();
        }
    }

    fn clear(&mut self) {
        self.exchanges.clear();
    }

    fn render(&self) -> Option<String> {
        if self.exchanges.is_empty() {
            return None;
        }
        Some(
            self.exchanges
                .iter()
                .map(|(q, a)| format!("User: {}\nAssistant: {}", q, a))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, corpus: Option<&str>, settings: Settings) -> Result<()> {
    let store = load_store(&settings, corpus)?;
    let mut registry = build_registry(store)?;
    let agent = build_agent(&settings, model, None)?;

    println!("\n{}", style("Pensum Chat").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let mut history = History::new();
    let stdin = io::stdin();

    loop {
        print!("{} ", style(">").green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "clear" => {
                history.clear();
                Output::info("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        match agent
            .respond(input, history.render().as_deref(), Some(&mut registry))
            .await
        {
            Ok(response) => {
                println!("\n{}\n", response.answer);
                for source in &response.sources {
                    Output::source(&source.text, source.link.as_deref());
                }
                history.push(input.to_string(), response.answer);
            }
            Err(e) => {
                Output::error(&format!("{}", e));
            }
        }
    }

    Ok(())
}
