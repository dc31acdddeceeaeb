//! Helpers for editing record payloads as raw JSON text.

use serde_json::Value;
use thiserror::Error;

use crate::types::Payload;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload must be a JSON object")]
    NotAnObject,
}

/// Parse raw text into a payload. Arrays, scalars and `null` are rejected.
pub fn parse_payload(text: &str) -> Result<Payload, PayloadError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadError::NotAnObject),
    }
}

pub fn is_valid_payload(text: &str) -> bool {
    parse_payload(text).is_ok()
}

/// Pretty-print with two-space indentation. Keys come out sorted, so the
/// output is stable for equal payloads.
pub fn format_payload(payload: &Payload) -> String {
    // Serializing a map of JSON values cannot fail.
    serde_json::to_string_pretty(payload).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_objects() {
        let payload = parse_payload(r#"{"color":"Blue","capacity GB":512}"#).unwrap();
        assert_eq!(payload["capacity GB"], 512);
        assert!(is_valid_payload("{}"));
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(parse_payload("[1,2]"), Err(PayloadError::NotAnObject));
        assert_eq!(parse_payload("42"), Err(PayloadError::NotAnObject));
        assert_eq!(parse_payload("null"), Err(PayloadError::NotAnObject));
        assert!(matches!(parse_payload("{oops"), Err(PayloadError::InvalidJson(_))));
        assert!(!is_valid_payload(""));
    }

    #[test]
    fn formats_with_two_space_indent() {
        let payload = parse_payload(r#"{"b":1,"a":{"x":true}}"#).unwrap();
        let expected = "{\n  \"a\": {\n    \"x\": true\n  },\n  \"b\": 1\n}";
        assert_eq!(format_payload(&payload), expected);
    }

    #[test]
    fn formatted_payload_parses_back() {
        let value = json!({
            "CPU model": "Intel Core i9",
            "price": 1849.99,
            "tags": ["a", "b"],
            "nested": {"deep": {"n": null}}
        });
        let Value::Object(payload) = value else {
            unreachable!()
        };
        assert_eq!(parse_payload(&format_payload(&payload)).unwrap(), payload);
    }
}
