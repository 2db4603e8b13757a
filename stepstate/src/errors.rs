//! Error types for stepstate.
//!
//! Context operations are total and never fail. These errors come only from
//! the collaborators around the context: snapshotting, checkpoint storage,
//! configuration and tracing setup.

use thiserror::Error;

/// The main error type for stepstate operations.
#[derive(Debug, Error)]
pub enum StepStateError {
    /// A value could not be converted to or from its JSON form.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or argument.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required checkpoint does not exist.
    #[error("Checkpoint not found: {0}")]
    NotFound(String),
}

impl StepStateError {
    /// Builds a serialization error that names the offending entry.
    pub(crate) fn serialization_for_entry(key: &str, err: &serde_json::Error) -> Self {
        Self::Serialization(format!("entry '{key}': {err}"))
    }
}

impl From<serde_json::Error> for StepStateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StepStateError>;
