//! Error types for Pensum.

use thiserror::Error;

/// Library-level error type for Pensum operations.
#[derive(Error, Debug)]
pub enum PensumError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Course store error: {0}")]
    Store(String),

    #[error("Model API error: {0}")]
    Model(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Pensum operations.
pub type Result<T> = std::result::Result<T, PensumError>;
