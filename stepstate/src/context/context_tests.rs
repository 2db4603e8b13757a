//! Behavioural tests for the context module.

#[cfg(test)]
mod tests {
    use crate::context::{ContextSnapshot, MutableContext};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn key_set(ctx: &MutableContext) -> HashSet<String> {
        ctx.get_keys().into_iter().collect()
    }

    #[test]
    fn test_put_then_get_for_varied_values() {
        let values = [
            json!(null),
            json!(0),
            json!(-3.5),
            json!(""),
            json!("text"),
            json!([1, "two", null]),
            json!({"offset": 42, "done": false}),
        ];

        for (i, value) in values.iter().enumerate() {
            let mut ctx = MutableContext::new();
            let key = format!("key-{i}");
            ctx.put(key.clone(), value.clone());

            assert_eq!(ctx.get(&key), Some(value));
            assert!(ctx.is_dirty());
        }
    }

    #[test]
    fn test_get_before_any_put_is_absent() {
        let ctx: MutableContext = MutableContext::new();

        for key in ["", "a", "read_count", "ünïcode"] {
            assert_eq!(ctx.get(key), None);
        }
    }

    #[test]
    fn test_clear_dirty_flag_from_any_state() {
        let mut clean: MutableContext = MutableContext::new();
        clean.clear_dirty_flag();
        assert!(!clean.is_dirty());

        let mut dirty = MutableContext::new();
        dirty.put("a", json!(1));
        dirty.clear_dirty_flag();
        assert!(!dirty.is_dirty());
    }

    #[test]
    fn test_clear_dirty_flag_is_idempotent() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1));

        ctx.clear_dirty_flag();
        assert!(!ctx.is_dirty());
        ctx.clear_dirty_flag();
        assert!(!ctx.is_dirty());
        assert_eq!(ctx.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_remove_then_get_is_absent() {
        let mut ctx = MutableContext::new();
        ctx.put("k", json!("v")).remove("k");

        assert_eq!(ctx.get("k"), None);
        assert!(!ctx.contains_key("k"));
    }

    #[test]
    fn test_remove_alone_never_dirties() {
        let mut ctx: MutableContext = MutableContext::new();
        ctx.remove("absent");
        assert!(!ctx.is_dirty());

        ctx.put("present", json!(1)).clear_dirty_flag();
        ctx.remove("present");
        assert!(!ctx.is_dirty());
    }

    #[test]
    fn test_get_keys_after_put_put_remove() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1));
        ctx.put("b", json!(2));
        ctx.remove("a");

        assert_eq!(key_set(&ctx), HashSet::from(["b".to_string()]));
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let mut ctx = MutableContext::new();

        ctx.put("x", json!(1));
        assert!(ctx.is_dirty());
        ctx.clear_dirty_flag();

        ctx.put("x", json!(2));
        assert!(ctx.is_dirty());
        assert_eq!(ctx.get("x"), Some(&json!(2)));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_chain_matches_separate_calls() {
        let mut chained = MutableContext::new();
        chained
            .put("a", json!(1))
            .put("b", json!(2))
            .clear_dirty_flag()
            .remove("a")
            .put("c", json!(3));

        let mut separate = MutableContext::new();
        separate.put("a", json!(1));
        separate.put("b", json!(2));
        separate.clear_dirty_flag();
        separate.remove("a");
        separate.put("c", json!(3));

        assert_eq!(chained, separate);
        assert_eq!(key_set(&chained), key_set(&separate));
        assert_eq!(chained.is_dirty(), separate.is_dirty());
    }

    #[test]
    fn test_reads_do_not_dirty() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1)).clear_dirty_flag();

        let _ = ctx.get("a");
        let _ = ctx.get("missing");
        let _ = ctx.get_keys();
        let _ = ctx.iter().count();

        assert!(!ctx.is_dirty());
    }

    #[test]
    fn test_persist_protocol_round() {
        let mut ctx = MutableContext::new();
        ctx.put("read_count", json!(100)).put("last_id", json!("sku-9"));

        assert!(ctx.is_dirty());
        let persisted: Vec<(String, Value)> = ctx
            .get_keys()
            .into_iter()
            .filter_map(|k| ctx.get(&k).cloned().map(|v| (k, v)))
            .collect();
        ctx.clear_dirty_flag();

        assert_eq!(persisted.len(), 2);
        assert!(!ctx.is_dirty());
    }

    #[test]
    fn test_snapshot_restore_preserves_entries() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1)).put("n", Value::Null);

        let restored: MutableContext = ContextSnapshot::capture(&ctx)
            .unwrap()
            .restore()
            .unwrap();

        assert_eq!(key_set(&restored), key_set(&ctx));
        assert_eq!(restored.get("n"), Some(&Value::Null));
        assert!(!restored.is_dirty());
    }
}
