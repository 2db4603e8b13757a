//! Lock-guarded handle for contexts shared between execution units.

use super::{ContextSnapshot, MutableContext};
use crate::errors::Result;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// A cloneable, thread-safe handle to a [`MutableContext`].
///
/// Every call takes the lock for its own duration. Use [`write`](Self::write)
/// to run several mutations under one lock, and
/// [`Checkpointer::checkpoint_shared`](crate::checkpoint::Checkpointer::checkpoint_shared)
/// to persist it: a separate `snapshot` then `clear_dirty_flag` can wipe the
/// dirty mark of a `put` made in between.
#[derive(Debug)]
pub struct SharedContext<V = serde_json::Value> {
    inner: Arc<RwLock<MutableContext<V>>>,
}

impl<V> Clone for SharedContext<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for SharedContext<V> {
    fn default() -> Self {
        Self::from_context(MutableContext::new())
    }
}

impl<V> SharedContext<V> {
    /// Creates a handle to a new, empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing context.
    #[must_use]
    pub fn from_context(ctx: MutableContext<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ctx)),
        }
    }

    /// Runs `f` with shared access to the context.
    pub fn read<R>(&self, f: impl FnOnce(&MutableContext<V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the context.
    pub fn write<R>(&self, f: impl FnOnce(&mut MutableContext<V>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Returns true if the context is dirty.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.read().is_dirty()
    }

    /// Clears the dirty flag.
    pub fn clear_dirty_flag(&self) -> &Self {
        self.inner.write().clear_dirty_flag();
        self
    }

    /// Stores a value and marks the context dirty.
    pub fn put(&self, key: impl Into<String>, value: V) -> &Self {
        self.inner.write().put(key, value);
        self
    }

    /// Removes an entry; the dirty flag is left untouched.
    pub fn remove(&self, key: &str) -> &Self {
        self.inner.write().remove(key);
        self
    }

    /// Returns all keys currently stored.
    #[must_use]
    pub fn get_keys(&self) -> Vec<String> {
        self.inner.read().get_keys()
    }

    /// Returns the inner context if this is the last handle.
    ///
    /// # Errors
    ///
    /// Gives the handle back when other clones are still alive.
    pub fn into_inner(self) -> std::result::Result<MutableContext<V>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<V: Clone> SharedContext<V> {
    /// Gets a copy of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.read().get(key).cloned()
    }
}

impl<V: Serialize> SharedContext<V> {
    /// Captures a snapshot under a single read lock.
    pub fn snapshot(&self) -> Result<ContextSnapshot> {
        ContextSnapshot::capture(&self.inner.read())
    }
}
