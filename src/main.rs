//! Pensum CLI entry point.

use anyhow::Result;
use clap::Parser;
use pensum::cli::{commands, Cli, Commands};
use pensum::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pensum={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    let corpus = cli.corpus.as_deref();

    // Execute command
    match &cli.command {
        Commands::Ask {
            question,
            model,
            rounds,
        } => {
            commands::run_ask(question, model.clone(), *rounds, corpus, settings).await?;
        }

        Commands::Chat { model } => {
            commands::run_chat(model.clone(), corpus, settings).await?;
        }

        Commands::Courses => {
            commands::run_courses(corpus, settings).await?;
        }

        Commands::Syllabus { course } => {
            commands::run_syllabus(course, corpus, settings).await?;
        }
    }

    Ok(())
}
