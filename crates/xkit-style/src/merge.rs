#![forbid(unsafe_code)]

//! Depth-limited deep merge of JSON documents.
//!
//! Used to layer theme files: a base document is overlaid with one or more
//! override documents, later layers winning key by key.
//!
//! Rules, applied recursively while depth remains:
//! - keys present on only one side are kept as-is;
//! - keys present on both sides whose values are both objects are merged;
//! - otherwise the override value replaces the base value;
//! - `null` in the override keeps the base value.
//!
//! Once the depth budget is spent, shared keys are replaced wholesale.
//! The inputs are never modified; the result shares nothing with them.

use serde_json::{Map, Value};

/// Depth used by [`crate::Theme::from_json_layers`].
pub const DEFAULT_MERGE_DEPTH: usize = 3;

/// Merge `overrides` onto `base`.
///
/// Non-object inputs at the top level yield `overrides` (or `base` when
/// `overrides` is `null`).
#[must_use]
pub fn merge_json(base: &Value, overrides: &Value, depth: usize) -> Value {
    match (base, overrides) {
        (_, Value::Null) => base.clone(),
        (Value::Object(b), Value::Object(o)) => Value::Object(merge_maps(b, o, depth)),
        _ => overrides.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, overrides: &Map<String, Value>, depth: usize) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in overrides {
        let merged = match out.get(key) {
            Some(existing) if depth > 0 => merge_json(existing, value, depth - 1),
            Some(existing) if value.is_null() => existing.clone(),
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merges_one_level() {
        let a = json!({"key1": 1, "key2": "demo"});
        let b = json!({"key1": 10, "key3": "world"});
        assert_eq!(
            merge_json(&a, &b, DEFAULT_MERGE_DEPTH),
            json!({"key1": 10, "key2": "demo", "key3": "world"})
        );
    }

    #[test]
    fn merges_two_levels_and_object_wins_over_scalar() {
        let a = json!({
            "aself": 1,
            "name": "John Doe",
            "address": {"street": "1 1st", "city": "San Francisco"}
        });
        let b = json!({
            "bself": 2,
            "name": {"firstName": "John", "lastName": "Doe"},
            "address": {"street": "2 2nd", "city": "San Francisco", "state": "CA"}
        });

        assert_eq!(
            merge_json(&a, &b, DEFAULT_MERGE_DEPTH),
            json!({
                "aself": 1,
                "bself": 2,
                "name": {"firstName": "John", "lastName": "Doe"},
                "address": {"street": "2 2nd", "city": "San Francisco", "state": "CA"}
            })
        );

        assert_eq!(
            merge_json(&b, &a, DEFAULT_MERGE_DEPTH),
            json!({
                "aself": 1,
                "bself": 2,
                "name": "John Doe",
                "address": {"street": "1 1st", "city": "San Francisco", "state": "CA"}
            })
        );
    }

    #[test]
    fn merges_into_empty() {
        let b = json!({"a": 1, "b": {"c": "asd"}});
        assert_eq!(merge_json(&json!({}), &b, DEFAULT_MERGE_DEPTH), b);
    }

    #[test]
    fn depth_zero_replaces_nested_objects() {
        let a = json!({"input": {"caret": "_", "space": "."}});
        let b = json!({"input": {"caret": "|"}});
        assert_eq!(merge_json(&a, &b, 0), json!({"input": {"caret": "|"}}));
        assert_eq!(
            merge_json(&a, &b, 1),
            json!({"input": {"caret": "|", "space": "."}})
        );
    }

    #[test]
    fn null_override_keeps_base() {
        let a = json!({"input": {"caret": "_"}});
        let b = json!({"input": {"caret": null}});
        assert_eq!(merge_json(&a, &b, DEFAULT_MERGE_DEPTH), a);
        assert_eq!(merge_json(&a, &Value::Null, 0), a);
    }

    #[test]
    fn scalar_top_level_takes_override() {
        assert_eq!(merge_json(&json!(1), &json!("x"), 3), json!("x"));
    }
}
