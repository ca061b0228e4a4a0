//! Property-based invariant tests for the layered JSON merge.
//!
//! 1. A `null` override leaves the base untouched at any depth.
//! 2. An empty object override leaves an object base untouched.
//! 3. Merged object keys are the union of both sides.
//! 4. Keys only the base has are carried over unchanged.
//! 5. At depth 0 every override key replaces wholesale, except `null`,
//!    which keeps an existing base value.

#![cfg(feature = "serde")]

use proptest::prelude::*;
use serde_json::{Map, Value, json};
use xkit_style::merge_json;

// ── Helpers ─────────────────────────────────────────────────────────────

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

/// Small nested documents; few distinct keys so both sides overlap often.
fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-d]", inner, 0..4)
            .prop_map(|entries| Value::Object(entries.into_iter().collect()))
    })
}

fn json_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-d]", json_value(), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Identity overrides
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn null_override_is_identity(base in json_value(), depth in 0usize..5) {
        prop_assert_eq!(merge_json(&base, &Value::Null, depth), base);
    }

    #[test]
    fn empty_object_override_is_identity(base in json_object(), depth in 0usize..5) {
        let base = Value::Object(base);
        prop_assert_eq!(merge_json(&base, &json!({}), depth), base);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Key coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merged_keys_are_union(base in json_object(), overrides in json_object(), depth in 0usize..5) {
        let merged = merge_json(&Value::Object(base.clone()), &Value::Object(overrides.clone()), depth);
        let Value::Object(merged) = merged else {
            return Err(TestCaseError::fail("object merge must yield an object"));
        };
        for key in merged.keys() {
            prop_assert!(base.contains_key(key) || overrides.contains_key(key));
        }
        for key in base.keys().chain(overrides.keys()) {
            prop_assert!(merged.contains_key(key));
        }
    }

    #[test]
    fn base_only_keys_are_unchanged(base in json_object(), overrides in json_object(), depth in 0usize..5) {
        let merged = merge_json(&Value::Object(base.clone()), &Value::Object(overrides.clone()), depth);
        for (key, value) in base.iter().filter(|(k, _)| !overrides.contains_key(*k)) {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Depth budget
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn depth_zero_replaces_shared_keys(base in json_object(), overrides in json_object()) {
        let merged = merge_json(&Value::Object(base.clone()), &Value::Object(overrides.clone()), 0);
        for (key, value) in &overrides {
            let expected = match base.get(key) {
                Some(existing) if value.is_null() => existing,
                _ => value,
            };
            prop_assert_eq!(merged.get(key), Some(expected));
        }
    }
}
