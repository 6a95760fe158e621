//! CLI module for Pensum.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Pensum - Course Material Q&A
///
/// A CLI assistant that answers questions about course materials.
/// The name "Pensum" comes from the Norwegian word for required course reading.
#[derive(Parser, Debug)]
#[command(name = "pensum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the course corpus JSON file (overrides configuration)
    #[arg(long, global = true)]
    pub corpus: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about the course corpus
    Ask {
        /// The question to answer
        question: String,

        /// Model to use (overrides configuration)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum tool rounds before the answer is forced
        #[arg(short, long)]
        rounds: Option<usize>,
    },

    /// Start an interactive chat session
    Chat {
        /// Model to use (overrides configuration)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the courses in the corpus
    Courses,

    /// Show the syllabus for a course
    Syllabus {
        /// Course title (partial names work)
        course: String,
    },
}
