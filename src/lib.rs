//! Pensum - Course Material Q&A
//!
//! A CLI assistant that answers questions about course materials by letting a
//! language model decide, mid-conversation, when to search course content or
//! pull up a syllabus before composing its final answer.
//!
//! The name "Pensum" comes from the Norwegian word for required course reading.
//!
//! # Overview
//!
//! Pensum allows you to:
//! - Ask questions about an indexed course corpus and get cited answers
//! - Let the model run bounded rounds of local tool lookups (content search,
//!   syllabus retrieval) before answering
//! - Browse the corpus directly (course list, syllabus rendering)
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `model` - Model client boundary (tagged response shape + OpenAI adapter)
//! - `store` - Course retrieval abstraction and in-memory backend
//! - `tools` - Tool contract, registry, and the two lookup tools
//! - `agent` - Transcript building and the round controller
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pensum::agent::Agent;
//! use pensum::model::OpenAiModel;
//! use pensum::store::MemoryCourseStore;
//! use pensum::tools::{CourseSearchTool, CourseSyllabusTool, ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryCourseStore::new());
//!
//!     let mut registry = ToolRegistry::new();
//!     registry.register(Box::new(CourseSearchTool::new(store.clone())))?;
//!     registry.register(Box::new(CourseSyllabusTool::new(store)))?;
//!
//!     let agent = Agent::new(Arc::new(OpenAiModel::new("gpt-4o-mini")));
//!     let response = agent
//!         .respond("What is covered in lesson 2?", None, Some(&mut registry))
//!         .await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod tools;

pub use error::{PensumError, Result};
