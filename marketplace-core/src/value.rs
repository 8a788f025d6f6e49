//! Helpers for the loosely typed JSON the partner API returns.
//!
//! The remote side is a PHP service: numbers may arrive as strings, flags as
//! `"Y"`/`"N"` or `1`/`0`, and lists as objects keyed by id.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Look up a value by dot-separated path (`"result.navigation.pageCount"`).
///
/// A key containing dots is tried verbatim first, then segment by segment.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(found) = value.get(path) {
        return Some(found);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Interpret an API flag: `1`, `"1"`, `"Y"` and `true` are true.
pub fn is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "Y" || s == "1",
        _ => false,
    }
}

/// Read an unsigned integer that may be encoded as a number or a string.
pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a scalar as text: strings verbatim, numbers and booleans formatted.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Records of a list-valued field.
///
/// JSON arrays yield their elements; objects (PHP arrays with non-sequential
/// keys) yield their values in document order. Anything else is not a list.
pub fn as_records(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::Object(map) => Some(map.values().cloned().collect()),
        _ => None,
    }
}

/// Deserialize a field that may be a string, a number or null into a string.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_text(&value).unwrap_or_default())
}

/// Deserialize an unsigned integer that may arrive as a number or a string.
pub fn u64_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_u64(&value).ok_or_else(|| serde::de::Error::custom(format!("expected an id, got {}", value)))
}
