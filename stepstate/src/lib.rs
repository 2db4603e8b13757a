//! # Stepstate
//!
//! A dirty-tracked execution context for batch pipeline steps.
//!
//! A step's reader, processor and writer share transient state through a
//! [`MutableContext`](context::MutableContext). Every write marks the context
//! dirty; the owner persists it and clears the flag:
//!
//! - **Context**: key-value state with dirty tracking and cheap snapshots
//! - **Checkpointing**: saves dirty contexts to a pluggable store and restores them
//! - **Configuration**: file- and environment-driven checkpoint settings
//! - **Observability**: `tracing` events with an opt-in subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepstate::prelude::*;
//! use serde_json::json;
//!
//! let checkpointer = Checkpointer::from_config(&CheckpointConfig::from_env()?);
//! let mut ctx = checkpointer.restore_or_default("import-products").await?;
//!
//! ctx.put("read_count", json!(120)).put("last_sku", json!("sku-120"));
//! checkpointer.checkpoint("import-products", &mut ctx).await?;
//! assert!(!ctx.is_dirty());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod checkpoint;
pub mod config;
pub mod context;
pub mod errors;
pub mod observability;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::checkpoint::{
        CheckpointOutcome, CheckpointStore, Checkpointer, JsonFileCheckpointStore,
        MemoryCheckpointStore,
    };
    pub use crate::config::CheckpointConfig;
    pub use crate::context::{ContextSnapshot, MutableContext, SharedContext};
    pub use crate::errors::{Result, StepStateError};
    pub use crate::observability::{init_tracing, LogFormat};
}
