//! Boolean normalization for form-encoded payloads
//!
//! The transport that carries layouts cannot send booleans, so every value
//! that means a boolean arrives as the string `"true"` or `"false"`. Records
//! are normalized at every nesting depth before they are compared or stored.

use serde_json::Value;

/// Replace `"true"`/`"false"` strings with booleans, recursively
pub fn normalize_booleans(value: &mut Value) {
    let replacement = match value {
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Array(items) => {
            items.iter_mut().for_each(normalize_booleans);
            None
        }
        Value::Object(map) => {
            map.values_mut().for_each(normalize_booleans);
            None
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    };

    if let Some(flag) = replacement {
        *value = Value::Bool(flag);
    }
}

/// Owned variant of [`normalize_booleans`]
#[must_use]
pub fn normalized(mut value: Value) -> Value {
    normalize_booleans(&mut value);
    value
}
