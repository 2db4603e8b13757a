//! Configuration for checkpoint persistence.

use crate::errors::{Result, StepStateError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding [`CheckpointConfig::directory`].
pub const ENV_CHECKPOINT_DIR: &str = "STEPSTATE_CHECKPOINT_DIR";
/// Environment variable overriding [`CheckpointConfig::pretty`].
pub const ENV_CHECKPOINT_PRETTY: &str = "STEPSTATE_CHECKPOINT_PRETTY";
/// Environment variable overriding [`CheckpointConfig::skip_clean`].
pub const ENV_CHECKPOINT_SKIP_CLEAN: &str = "STEPSTATE_CHECKPOINT_SKIP_CLEAN";

/// Configuration for checkpointing contexts to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Directory holding one JSON file per checkpoint key.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Whether to pretty-print checkpoint files.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Whether to skip saving contexts that are not dirty.
    #[serde(default = "default_skip_clean")]
    pub skip_clean: bool,
}

fn default_directory() -> PathBuf {
    PathBuf::from("checkpoints")
}

fn default_pretty() -> bool {
    true
}

fn default_skip_clean() -> bool {
    true
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            pretty: default_pretty(),
            skip_clean: default_skip_clean(),
        }
    }
}

impl CheckpointConfig {
    /// Creates a new checkpoint configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the checkpoint directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets whether files are pretty-printed.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets whether clean contexts are skipped.
    #[must_use]
    pub fn with_skip_clean(mut self, skip_clean: bool) -> Self {
        self.skip_clean = skip_clean;
        self
    }

    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StepStateError::Config(format!("invalid checkpoint config: {e}")))
    }

    /// Builds a configuration from the `STEPSTATE_CHECKPOINT_*` environment
    /// variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_CHECKPOINT_DIR).filter(|d| !d.is_empty()) {
            config.directory = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_CHECKPOINT_PRETTY) {
            config.pretty = parse_bool(ENV_CHECKPOINT_PRETTY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CHECKPOINT_SKIP_CLEAN) {
            config.skip_clean = parse_bool(ENV_CHECKPOINT_SKIP_CLEAN, &raw)?;
        }

        Ok(config)
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(StepStateError::Config(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
