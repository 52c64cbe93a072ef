//! Lenient field access over loosely-shaped upstream JSON.
//!
//! Every helper here is total: a missing key, a `null`, or a value of the
//! wrong type yields `None` instead of an error.

use serde_json::{Map, Value};

/// Returns the first non-null value stored under any of `keys`.
pub(crate) fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Integer view of a value: integers, integral floats and numeric strings.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Hour view of a value.
///
/// Accepts anything [`as_integer`] accepts, plus ISO-8601 timestamps whose
/// hour lives at byte offset 11..13 (`2024-03-04T08:00:00`).
pub(crate) fn as_hour(value: &Value) -> Option<i32> {
    if let Some(hour) = as_integer(value) {
        return i32::try_from(hour).ok();
    }
    let text = value.as_str()?;
    let digits = text.get(11..13)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Trimmed, non-empty string view of a value. Numbers are stringified.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A string or an array of strings, flattened into a list.
pub(crate) fn as_text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        other => as_text(other).into_iter().collect(),
    }
}

/// Boolean view: JSON booleans, 0/1, and "true"/"false" strings.
pub(crate) fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
