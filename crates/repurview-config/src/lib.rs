//! Configuration loading for Repurview.
//! Reads repurview.toml from the current directory or the path in the REPURVIEW_CONFIG env var.

use repurview_common::{ReviewQuestion, ScoringRules};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "REPURVIEW_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "repurview.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scoring: ScoringRules,
    #[serde(default)]
    pub questions: QuestionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sample: SampleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Capacity of the SSE broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_bind()         -> String { "127.0.0.1:3001".to_string() }
fn default_event_buffer() -> usize  { 256 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), event_buffer: default_event_buffer() }
    }
}

/// Overrides the built-in question catalog when non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionsConfig {
    #[serde(default)]
    pub catalog: Vec<ReviewQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, used when RUST_LOG is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleConfig {
    /// Preload the sample hypotheses at startup.
    #[serde(default = "bool_true")]
    pub seed: bool,
}

fn bool_true() -> bool { true }

impl Default for SampleConfig {
    fn default() -> Self {
        Self { seed: bool_true() }
    }
}

mod tests;

impl Config {
    /// Load configuration from repurview.toml.
    /// Checks REPURVIEW_CONFIG first; a missing default file yields the defaults,
    /// a missing file named by the env var is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(path),
            Err(_) => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    Self::from_path(DEFAULT_CONFIG_FILE)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate().map_err(ConfigError::Invalid)?;

        if self.server.event_buffer == 0 {
            return Err(ConfigError::Invalid("server.event_buffer must be non-zero".to_string()));
        }

        let mut seen = HashSet::new();
        for question in &self.questions.catalog {
            if question.id.as_str().trim().is_empty() {
                return Err(ConfigError::Invalid("question ids must be non-empty".to_string()));
            }
            if !seen.insert(question.id.clone()) {
                return Err(ConfigError::Invalid(format!("duplicate question id: {}", question.id)));
            }
        }
        Ok(())
    }
}
