//! The mutable, dirty-tracked execution context.

use std::collections::HashMap;

/// Key-value state carried between the steps of a batch job.
///
/// Every [`put`](Self::put) marks the context dirty; only the owner clears the
/// flag, normally right after persisting the state. Values are opaque: they
/// are stored and handed back without inspection or copying.
///
/// [`get`](Self::get) returns `None` only when the key has no entry, so a
/// stored `serde_json::Value::Null` reads back as `Some(&Value::Null)`.
///
/// Removing an entry does **not** mark the context dirty. A change made only
/// of removals is invisible to [`is_dirty`](Self::is_dirty).
///
/// Mutators return `&mut Self` so calls can be chained:
///
/// ```
/// use stepstate::context::MutableContext;
/// use serde_json::json;
///
/// let mut ctx = MutableContext::new();
/// ctx.put("read_count", json!(10)).put("cursor", json!("a1")).remove("cursor");
///
/// assert!(ctx.is_dirty());
/// assert_eq!(ctx.get_keys(), vec!["read_count".to_string()]);
/// assert!(!ctx.clear_dirty_flag().is_dirty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MutableContext<V = serde_json::Value> {
    entries: HashMap<String, V>,
    dirty: bool,
}

impl<V> Default for MutableContext<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            dirty: false,
        }
    }
}

impl<V> MutableContext<V> {
    /// Creates an empty, clean context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a clean context from already persisted entries.
    pub(crate) fn from_entries(entries: HashMap<String, V>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    /// Returns true if a `put` happened since the flag was last cleared.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag.
    pub fn clear_dirty_flag(&mut self) -> &mut Self {
        if self.dirty {
            tracing::trace!(entries = self.entries.len(), "Clearing context dirty flag");
        }
        self.dirty = false;
        self
    }

    /// Re-marks the context dirty after a snapshot of it failed to persist.
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Gets the value stored under `key`, or `None` if there is no entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Always marks the context dirty, even if the value is unchanged.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        self.entries.insert(key.into(), value);
        self.dirty = true;
        self
    }

    /// Removes the entry for `key` if there is one.
    ///
    /// Leaves the dirty flag untouched.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.remove(key);
        self
    }

    /// Returns all keys currently stored, in no particular order.
    #[must_use]
    pub fn get_keys(&self) -> Vec<String> {
        self.keys().map(String::from).collect()
    }

    /// Iterates over the stored keys without allocating.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Checks if a key has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
