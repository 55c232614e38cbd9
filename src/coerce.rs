//! Explicit, total parsing and coercion functions.
//!
//! # Design
//! The service this mocks leaned on implicit coercion (string→int parsing
//! that produces incomparable values, truthiness for booleans). These
//! functions make the same observable behavior explicit: every function is
//! total, returning `Option` or a plain `bool`, and parse failure never
//! becomes a server error. An unparsable identifier is simply a value that
//! matches no stored id, i.e. "not found".

use serde_json::Value;

/// Parses a path or query segment as a todo id.
///
/// `None` means the segment can never match a stored id; callers treat it as
/// not-found, never as a 4xx/5xx parse error.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Extracts an integer from a JSON value, accepting numbers and numeric
/// strings. Floats and everything else are `None`.
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean coercion by truthiness: `null`, `false`, `0`, and `""` are false;
/// every other value is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
