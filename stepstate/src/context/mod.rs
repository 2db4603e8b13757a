//! Execution context for batch pipeline steps.
//!
//! This module provides:
//! - The mutable, dirty-tracked context a step reads and writes
//! - Serializable snapshots for persisting it
//! - A lock-guarded handle for sharing one context across threads

#[cfg(test)]
mod context_tests;
mod mutable;
mod shared;
mod snapshot;

pub use mutable::MutableContext;
pub use shared::SharedContext;
pub use snapshot::ContextSnapshot;
