//! Meaningful-data predicate applied before exporting an entry

use serde_json::Value;

/// Whether a value carries any data worth exporting.
///
/// Recursively true if any leaf is a non-blank string, a finite number
/// (zero counts), or a boolean; arrays need at least one meaningful
/// element and objects at least one meaningful value. `null`, empty
/// containers, and blank strings carry nothing.
pub fn has_meaningful_data(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) => true,
        // serde_json numbers are always finite
        Value::Number(_) => true,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => items.iter().any(has_meaningful_data),
        Value::Object(map) => map.values().any(has_meaningful_data),
    }
}
