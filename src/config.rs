use crate::bus::DEFAULT_CHANNEL_CAPACITY;
use crate::console_paths;
use crate::error::ConsoleError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Buffered messages per channel before slow subscribers start lagging.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Structured action log settings.
/// All fields have defaults so an empty file is a valid config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Whether to write `events.jsonl`. Default: true
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,
    /// Overrides `~/.repair-console/logs`.
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
    /// Fixed session ID for log correlation. Default: a fresh UUID per run.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            logs_dir: None,
            session_id: None,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_logging_enabled() -> bool {
    true
}

impl ConsoleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).context("Failed to parse config as YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(ConsoleError::Config {
                message: "channel_capacity must be at least 1".to_string(),
            }
            .into());
        }

        if let Some(session_id) = &self.logging.session_id {
            if session_id.trim().is_empty() {
                return Err(ConsoleError::Config {
                    message: "logging.session_id must not be blank".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Directory for structured logs, created on demand by the logger.
    pub fn logs_dir(&self) -> Result<PathBuf> {
        match &self.logging.logs_dir {
            Some(dir) => Ok(dir.clone()),
            None => console_paths::logs_dir(),
        }
    }

    pub fn session_id(&self) -> String {
        self.logging
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
