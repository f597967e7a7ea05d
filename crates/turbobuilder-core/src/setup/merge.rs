//! Deep merge of JSON setup documents

use serde_json::Value;

/// Merge `source` into `target`: objects merge key by key recursively, any other value
/// (arrays included) replaces the target one
pub fn merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                match target_map.get_mut(key) {
                    Some(target_value) => merge(target_value, source_value),
                    None => {
                        target_map.insert(key.clone(), source_value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_objects_are_merged() {
        let mut target = json!({ "build": { "lib_ts": { "compilerStrict": true, "targets": [] } } });
        merge(&mut target, &json!({ "build": { "lib_ts": { "compilerStrict": false } } }));

        assert_eq!(
            target,
            json!({ "build": { "lib_ts": { "compilerStrict": false, "targets": [] } } })
        );
    }

    #[test]
    fn test_arrays_are_replaced() {
        let mut target = json!({ "test": [{ "type": "phpUnit" }, { "type": "jasmine" }] });
        merge(&mut target, &json!({ "test": [] }));
        assert_eq!(target, json!({ "test": [] }));
    }

    #[test]
    fn test_new_keys_are_added_and_scalars_replace_objects() {
        let mut target = json!({ "sync": [], "metadata": { "name": "" } });
        merge(
            &mut target,
            &json!({ "sync": { "type": "ftp" }, "metadata": "broken", "extra": 1 }),
        );
        assert_eq!(
            target,
            json!({ "sync": { "type": "ftp" }, "metadata": "broken", "extra": 1 })
        );
    }
}
