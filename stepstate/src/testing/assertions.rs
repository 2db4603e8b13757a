//! Test assertions for execution contexts.

use crate::context::MutableContext;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Asserts that the context has unsaved writes.
pub fn assert_dirty<V>(ctx: &MutableContext<V>) {
    assert!(
        ctx.is_dirty(),
        "Expected dirty context, but it is clean. Keys: {:?}",
        sorted_keys(ctx)
    );
}

/// Asserts that the context has no unsaved writes.
pub fn assert_clean<V>(ctx: &MutableContext<V>) {
    assert!(
        !ctx.is_dirty(),
        "Expected clean context, but it is dirty. Keys: {:?}",
        sorted_keys(ctx)
    );
}

/// Asserts that the context holds exactly `expected` keys, in any order.
pub fn assert_keys<V>(ctx: &MutableContext<V>, expected: &[&str]) {
    let actual = sorted_keys(ctx);
    let expected: BTreeSet<String> = expected.iter().map(|k| (*k).to_string()).collect();
    assert_eq!(actual, expected, "Context keys differ");
}

/// Asserts that `key` is present and holds `expected`.
pub fn assert_entry<V: PartialEq + Debug>(ctx: &MutableContext<V>, key: &str, expected: &V) {
    match ctx.get(key) {
        Some(actual) => assert_eq!(
            actual, expected,
            "Unexpected value for key '{key}'"
        ),
        None => panic!(
            "Expected context to contain key '{}', but it doesn't. Keys: {:?}",
            key,
            sorted_keys(ctx)
        ),
    }
}

fn sorted_keys<V>(ctx: &MutableContext<V>) -> BTreeSet<String> {
    ctx.get_keys().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assertions_pass() {
        let mut ctx = MutableContext::new();
        ctx.put("a", json!(1)).put("b", json!(2));

        assert_dirty(&ctx);
        assert_keys(&ctx, &["b", "a"]);
        assert_entry(&ctx, "a", &json!(1));

        ctx.clear_dirty_flag();
        assert_clean(&ctx);
    }

    #[test]
    #[should_panic(expected = "Expected context to contain key 'missing'")]
    fn test_assert_entry_missing() {
        let ctx: MutableContext = MutableContext::new();
        assert_entry(&ctx, "missing", &json!(1));
    }

    #[test]
    #[should_panic(expected = "Expected dirty context")]
    fn test_assert_dirty_on_clean() {
        let ctx: MutableContext = MutableContext::new();
        assert_dirty(&ctx);
    }
}
