//! Configuration module for Pensum.
//!
//! Handles loading and managing application settings from a TOML file.

use crate::error::{PensumError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub retrieval: RetrievalSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Chat model to use.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tool-enabled rounds per question.
    pub max_rounds: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_rounds: 2,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Path to the course corpus JSON file.
    pub corpus_path: Option<String>,
    /// Maximum number of search results per query.
    pub max_results: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            corpus_path: None,
            max_results: 5,
        }
    }
}

/// Prompt settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Path to a file overriding the built-in system prompt.
    pub system_path: Option<String>,
}

impl Settings {
    /// Default configuration file path (~/.pensum/config.toml).
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pensum")
            .join("config.toml")
    }

    /// Load settings from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or the default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PensumError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Corpus path as a `PathBuf`, if configured.
    pub fn corpus_path(&self) -> Option<PathBuf> {
        self.retrieval.corpus_path.as_ref().map(PathBuf::from)
    }

    /// Custom system prompt text, if one is configured.
    pub fn system_prompt(&self) -> Result<Option<String>> {
        match &self.prompts.system_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    PensumError::Config(format!("Failed to read system prompt {}: {}", path, e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }
}
