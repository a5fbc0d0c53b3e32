use crate::error::AppResult;
use serde_json::Value as JsonValue;

/// Mask free-text and identity fields in a JSON payload before it is written
/// to the debug log. Numeric and enum columns stay visible.
pub fn redact_sensitive_data(data: &JsonValue) -> AppResult<JsonValue> {
    let redacted = redact_value(data);
    Ok(redacted)
}

fn redact_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut redacted_map = serde_json::Map::new();
            for (key, val) in map {
                let redacted_val = if is_sensitive_field(key) {
                    redact_string_value(val)
                } else {
                    redact_value(val)
                };
                redacted_map.insert(key.clone(), redacted_val);
            }
            JsonValue::Object(redacted_map)
        }
        JsonValue::Array(arr) => {
            let redacted_arr: Vec<JsonValue> = arr.iter().map(redact_value).collect();
            JsonValue::Array(redacted_arr)
        }
        _ => value.clone(),
    }
}

fn is_sensitive_field(field_name: &str) -> bool {
    let lower = field_name.to_lowercase();
    matches!(
        lower.as_str(),
        "comment" | "comments" | "feedback" | "note" | "notes" | "name" | "explanation"
    )
}

fn redact_string_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::String(s) if !s.is_empty() => JsonValue::String("[REDACTED]".to_string()),
        _ => value.clone(),
    }
}
