//! Checkpoint persistence for execution contexts.
//!
//! This module provides:
//! - The `CheckpointStore` trait with in-memory and JSON-file backends
//! - The `Checkpointer`, which saves dirty contexts and clears their flag

mod checkpointer;
mod store;

pub use checkpointer::{CheckpointOutcome, Checkpointer};
pub use store::{CheckpointStore, JsonFileCheckpointStore, MemoryCheckpointStore};
