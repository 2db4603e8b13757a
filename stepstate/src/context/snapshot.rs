//! Point-in-time snapshots of a context.

use super::MutableContext;
use crate::errors::{Result, StepStateError};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// An owned, serializable copy of a context's entries.
///
/// Entries are kept sorted by key so that serialized snapshots of equal
/// state are byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Unique, time-ordered snapshot ID.
    pub id: Uuid,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Captured entries.
    #[serde(default)]
    pub entries: BTreeMap<String, serde_json::Value>,
}

impl ContextSnapshot {
    /// Captures every entry of `ctx`.
    ///
    /// Reads only; the context's dirty flag is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`StepStateError::Serialization`] naming the first entry whose
    /// value cannot be represented as JSON.
    pub fn capture<V: Serialize>(ctx: &MutableContext<V>) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for key in ctx.get_keys() {
            let Some(value) = ctx.get(&key) else {
                continue;
            };
            let json = serde_json::to_value(value).map_err(|e| StepStateError::serialization_for_entry(&key, &e))?;
            entries.insert(key, json);
        }

        Ok(Self {
            id: Uuid::now_v7(),
            taken_at: Utc::now(),
            entries,
        })
    }

    /// Rebuilds a context holding the captured entries.
    ///
    /// The returned context is clean: it matches what was persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StepStateError::Serialization`] if an entry does not
    /// deserialize into `V`.
    pub fn restore<V: DeserializeOwned>(&self) -> Result<MutableContext<V>> {
        let entries = self
            .entries
            .iter()
            .map(|(key, json)| {
                V::deserialize(json)
                    .map(|value| (key.clone(), value))
                    .map_err(|e| StepStateError::serialization_for_entry(key, &e))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(MutableContext::from_entries(entries))
    }

    /// Gets a captured value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Returns the number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::ser::Error as _;
    use serde_json::json;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_capture_leaves_dirty_flag() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1));

        let snapshot = ContextSnapshot::capture(&ctx).unwrap();

        assert!(ctx.is_dirty());
        assert_eq!(snapshot.get("a"), Some(&json!(1)));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_restore_is_clean() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1)).put("b", json!({"nested": [1, 2]}));

        let restored: MutableContext = ContextSnapshot::capture(&ctx).unwrap().restore().unwrap();

        assert!(!restored.is_dirty());
        assert_eq!(restored.get("b"), Some(&json!({"nested": [1, 2]})));
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_restore_typed_values() {
        let mut ctx: MutableContext<u64> = MutableContext::new();
        ctx.put("read", 12).put("written", 10);

        let snapshot = ContextSnapshot::capture(&ctx).unwrap();
        let restored: MutableContext<u64> = snapshot.restore().unwrap();

        assert_eq!(restored.get("written"), Some(&10));
    }

    #[test]
    fn test_restore_type_mismatch() {
        let mut ctx = MutableContext::new();
        ctx.put("count", json!("twelve"));

        let snapshot = ContextSnapshot::capture(&ctx).unwrap();
        let err = snapshot.restore::<u64>().unwrap_err();

        assert!(err.to_string().contains("entry 'count'"));
    }

    #[test]
    fn test_capture_failure_names_entry() {
        let mut ctx = MutableContext::new();
        ctx.put("broken", Unserializable);

        let err = ContextSnapshot::capture(&ctx).unwrap_err();
        assert!(matches!(err, StepStateError::Serialization(ref m) if m.contains("broken")));
    }

    #[test]
    fn test_serialized_entries_are_sorted() {
        let mut ctx = MutableContext::new();
        ctx.put("z", json!(1)).put("a", json!(2)).put("m", json!(3));

        let snapshot = ContextSnapshot::capture(&ctx).unwrap();
        let keys: Vec<_> = snapshot.entries.keys().cloned().collect();

        assert_eq!(keys, vec!["a", "m", "z"]);
    }
}
