use serde_json::Value;
use tracing::warn;

/// Decodes a snapshot field that may arrive as JSON text.
///
/// Absent, `null` and blank values decode to `None`. Strings are parsed as
/// JSON; text that does not parse is kept, trimmed, as a JSON string.
/// Anything already structured is returned unchanged.
#[must_use]
pub fn decode_json_value(raw: Option<&Value>) -> Option<Value> {
    match raw? {
        Value::Null => None,
        Value::String(text) => decode_json_text(text),
        structured => Some(structured.clone()),
    }
}

fn decode_json_text(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(error = %error, "snapshot text is not valid JSON; keeping raw text");
            Some(Value::String(trimmed.to_owned()))
        }
    }
}
