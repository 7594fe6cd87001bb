//! Recursive property merge

use serde_json::{Map, Value};

/// Merge every entry of `source` into `target` and return `target`.
///
/// - Scalars are assigned.
/// - Arrays are replaced by a fresh copy, so later edits to the result
///   never reach `source`.
/// - Objects merge recursively. A missing (or non-object) target entry is
///   first replaced by an empty object.
pub fn extend<'t>(
    target: &'t mut Map<String, Value>,
    source: &Map<String, Value>,
) -> &'t mut Map<String, Value> {
    for (key, value) in source {
        match value {
            Value::Object(nested) => {
                let slot = target
                    .entry(key.as_str())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(inner) = slot {
                    extend(inner, nested);
                }
            }
            Value::Array(items) => {
                target.insert(key.clone(), Value::Array(items.to_vec()));
            }
            scalar => {
                target.insert(key.clone(), scalar.clone());
            }
        }
    }

    tracing::trace!(keys = source.len(), "extend");
    target
}
