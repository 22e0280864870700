//! Numeric normalization of loosely-typed device payloads.
//!
//! One firmware generation formats every number as a string (`"%.2f"`),
//! another sends native JSON numbers. `coerce` folds both into numbers so the
//! rest of the core never branches on the wire version.

use serde_json::{Number, Value};

/// Recursively convert numeric-looking leaves into JSON numbers.
///
/// - Objects and arrays are rebuilt with every leaf coerced; key set and
///   element order are preserved.
/// - Strings that parse as a finite number become numbers. Integer literals
///   stay integers (`"20"` -> `20`), everything else becomes `f64`.
/// - Empty or whitespace-only strings, `null`, booleans and non-numeric
///   strings pass through unchanged.
///
/// Idempotent: `coerce(coerce(v)) == coerce(v)`.
pub fn coerce(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, coerce(v))).collect()),
        Value::Array(items) => Value::Array(items.into_iter().map(coerce).collect()),
        Value::String(s) => parse_numeric(&s).unwrap_or(Value::String(s)),
        other => other,
    }
}

fn parse_numeric(s: &str) -> Option<Value> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(i) = t.parse::<i64>() {
        return Some(Value::from(i));
    }
    if let Ok(u) = t.parse::<u64>() {
        return Some(Value::from(u));
    }
    // f64::from_str also accepts "inf" and "NaN"; those stay strings
    let f = t.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Number::from_f64(f).map(Value::Number)
}
