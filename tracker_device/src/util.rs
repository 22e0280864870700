use serde_json::Value;

/// Append an API path to a base URL without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Extract the acknowledgement from a `POST /v1/setting` response.
///
/// The mock server answers `{"message": "..."}`, the firmware answers with a
/// plain text line. Anything else is returned as trimmed text.
pub fn parse_ack(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(m)) => m.clone(),
            _ => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

/// Number formatted the way the firmware puts it on the wire (`"%.2f"`).
pub fn wire_num(v: f64) -> Value {
    Value::String(format!("{v:.2}"))
}
