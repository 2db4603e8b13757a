//! Testing utilities for code that owns execution contexts.
//!
//! Assertion helpers that report the full key set on failure.

mod assertions;

pub use assertions::{assert_clean, assert_dirty, assert_entry, assert_keys};
