//! Field-path level merging of partial documents

use serde_json::{Map, Value};

/// Expand dotted keys into nested objects
///
/// `{"address.city": "Pune", "address": {"state": "MH"}}` becomes
/// `{"address": {"city": "Pune", "state": "MH"}}`. Nulls are kept so that
/// [`merge_patch`] can use them to clear fields.
pub fn expand_dotted_paths(patch: &Map<String, Value>) -> Map<String, Value> {
    let mut expanded = Map::new();

    for (key, value) in patch {
        let value = match value {
            Value::Object(nested) => Value::Object(expand_dotted_paths(nested)),
            other => other.clone(),
        };

        let mut segments = key.split('.').filter(|s| !s.is_empty()).rev();
        let Some(leaf) = segments.next() else {
            continue;
        };

        let mut nested = Map::new();
        nested.insert(leaf.to_string(), value);
        let nested = segments.fold(nested, |inner, segment| {
            let mut outer = Map::new();
            outer.insert(segment.to_string(), Value::Object(inner));
            outer
        });

        for (key, value) in nested {
            deep_insert(&mut expanded, key, value);
        }
    }

    expanded
}

fn deep_insert(target: &mut Map<String, Value>, key: String, value: Value) {
    if let Value::Object(incoming) = value {
        if let Some(Value::Object(existing)) = target.get_mut(&key) {
            for (k, v) in incoming {
                deep_insert(existing, k, v);
            }
            return;
        }
        target.insert(key, Value::Object(incoming));
    } else {
        target.insert(key, value);
    }
}

/// Apply `patch` onto `target` (JSON merge patch semantics)
///
/// Objects merge member by member, `null` removes the member, any other
/// value replaces what was there.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(target) = target {
        for (key, value) in patch {
            if value.is_null() {
                target.remove(key);
            } else {
                merge_patch(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_expand_dotted_paths() {
        let expanded = expand_dotted_paths(&object(json!({
            "address.city": "Pune",
            "address": { "state": "MH" },
            "phone.number": null,
            "firstName": "Ada"
        })));

        assert_eq!(
            Value::Object(expanded),
            json!({
                "address": { "city": "Pune", "state": "MH" },
                "phone": { "number": null },
                "firstName": "Ada"
            })
        );
    }

    #[test]
    fn test_merge_keeps_omitted_members() {
        let mut target = json!({
            "firstName": "Ada",
            "address": { "street": "1 Main St", "city": "Pune", "zipCode": "411001" }
        });

        merge_patch(&mut target, &json!({ "address": { "city": "Mumbai" } }));

        assert_eq!(
            target,
            json!({
                "firstName": "Ada",
                "address": { "street": "1 Main St", "city": "Mumbai", "zipCode": "411001" }
            })
        );
    }

    #[test]
    fn test_merge_null_removes() {
        let mut target = json!({ "middleName": "B", "address": { "zipCode": "411001" } });

        merge_patch(
            &mut target,
            &json!({ "middleName": null, "address": { "zipCode": null } }),
        );

        assert_eq!(target, json!({ "address": {} }));
    }

    #[test]
    fn test_merge_replaces_scalars_and_non_objects() {
        let mut target = json!({ "phone": "9876543210" });
        merge_patch(&mut target, &json!({ "phone": { "number": "9876543210" } }));
        assert_eq!(target, json!({ "phone": { "number": "9876543210" } }));

        let mut target = json!({ "a": 1 });
        merge_patch(&mut target, &json!([1]));
        assert_eq!(target, json!([1]));
    }
}
