//! Response normalization — pull plain text out of provider-specific bodies.
//!
//! Fields are addressed with JSON pointers (`/choices/0/message/content`).
//! An absent or empty field is a normalization gap, not an error: the whole
//! body is serialized instead.

use serde_json::Value;

use crate::transport::Body;

/// Serialize a JSON value to text. Non-empty strings are returned unquoted;
/// the result is never empty.
pub fn serialize(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        other => other.to_string(),
    }
}

/// Null, `false`, zero, `""`, `[]` or `{}`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Non-empty string at `pointer`, if any.
pub fn text_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// First non-empty string among `pointers`, in order.
pub fn first_text(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| text_at(value, p))
}

/// Extract text from `body` via `pointers`, falling back to the serialized
/// body. An empty body comes back as `""`.
pub fn extract(body: Body, pointers: &[&str]) -> String {
    match body {
        Body::Text(text) if text.is_empty() => serialize(&Value::String(text)),
        Body::Text(text) => text,
        Body::Json(value) => first_text(&value, pointers).unwrap_or_else(|| serialize(&value)),
    }
}
