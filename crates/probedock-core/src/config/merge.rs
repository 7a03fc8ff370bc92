//! Deep merge of configuration layers.

use serde_json::{Map, Value};

/// Merge `overlay` on top of `base`.
///
/// - objects are merged key by key, recursively
/// - arrays are unioned: base elements first, then overlay elements not
///   already present, without duplicates
/// - anything else in `overlay` replaces the value in `base`
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            Value::Object(merge_objects(base, overlay))
        }
        (Value::Array(base), Value::Array(overlay)) => Value::Array(union(base, overlay)),
        (_, overlay) => overlay,
    }
}

fn merge_objects(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overlay {
        let merged = match base.remove(&key) {
            Some(existing) => deep_merge(existing, value),
            None => value,
        };
        base.insert(key, merged);
    }
    base
}

fn union(base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(base.len() + overlay.len());
    for value in base.into_iter().chain(overlay) {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_overwrite() {
        let merged = deep_merge(
            json!({ "publish": true, "server": "a" }),
            json!({ "publish": false }),
        );
        assert_eq!(merged, json!({ "publish": false, "server": "a" }));
    }

    #[test]
    fn test_nested_objects_merge() {
        let merged = deep_merge(
            json!({ "servers": { "a": { "apiUrl": "u" } } }),
            json!({ "servers": { "a": { "apiToken": "t" }, "b": { "apiUrl": "v" } } }),
        );
        assert_eq!(
            merged,
            json!({
                "servers": {
                    "a": { "apiUrl": "u", "apiToken": "t" },
                    "b": { "apiUrl": "v" }
                }
            })
        );
    }

    #[test]
    fn test_arrays_union_in_first_occurrence_order() {
        let merged = deep_merge(
            json!({ "tags": ["yee", "haw"] }),
            json!({ "tags": ["haw", "yay", "yay"] }),
        );
        assert_eq!(merged, json!({ "tags": ["yee", "haw", "yay"] }));
    }

    #[test]
    fn test_type_change_replaces() {
        let merged = deep_merge(json!({ "project": { "apiId": "x" } }), json!({ "project": 3 }));
        assert_eq!(merged, json!({ "project": 3 }));
    }
}
