//! Observability utilities.
//!
//! The library only emits through `tracing` macros. Binaries and tests that
//! want to see those events install a subscriber with [`init_tracing`].

use crate::errors::{Result, StepStateError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Builds the filter, preferring `RUST_LOG` over `default_directive`.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| StepStateError::Config(format!("invalid log directive '{default_directive}': {e}"))),
    }
}

/// Installs a global tracing subscriber.
///
/// # Errors
///
/// Fails if the directive does not parse or a global subscriber is already
/// installed.
pub fn init_tracing(format: LogFormat, default_directive: &str) -> Result<()> {
    let filter = env_filter(default_directive)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    installed.map_err(|e| StepStateError::Config(format!("tracing already initialised: {e}")))
}
