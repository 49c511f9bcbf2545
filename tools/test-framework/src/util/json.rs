/*!
   Loose accessors over [`serde_json::Value`] for CLI and REST responses.

   The shape of query responses drifts between SDK versions (numbers
   rendered as strings, fields nested under an extra object), so these
   helpers never fail: a missing or mistyped field reads as empty.
*/

use serde_json as json;

/// Walks `path` through nested objects, returning the value at the end.
pub fn value_at<'a>(value: &'a json::Value, path: &[&str]) -> Option<&'a json::Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/**
   Returns the string at `path`. Numbers are rendered in decimal, since
   some endpoints emit heights and amounts unquoted.
*/
pub fn string_at(value: &json::Value, path: &[&str]) -> String {
    value_at(value, path).map(string_of).unwrap_or_default()
}

pub fn string_of(value: &json::Value) -> String {
    match value {
        json::Value::String(s) => s.clone(),
        json::Value::Number(n) => n
            .as_u64()
            .map(|n| n.to_string())
            .or_else(|| n.as_i64().map(|n| n.to_string()))
            .or_else(|| n.as_f64().map(|n| (n as i64).to_string()))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Returns the object at `path`, if it is a non-empty object.
pub fn object_at<'a>(value: &'a json::Value, path: &[&str]) -> Option<&'a json::Value> {
    value_at(value, path).filter(|v| v.as_object().map_or(false, |o| !o.is_empty()))
}
