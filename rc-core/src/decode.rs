//! Helpers for pulling typed payloads out of REST JSON envelopes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, RocketChatError};

/// Takes `field` out of `body` and deserializes it. A missing field is a decode error.
pub fn field<T: DeserializeOwned>(mut body: Value, field: &str) -> Result<T> {
    let value = body
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| RocketChatError::Decode(format!("missing field `{field}`")))?;
    serde_json::from_value(value)
        .map_err(|e| RocketChatError::Decode(format!("invalid `{field}`: {e}")))
}

/// Like [`field`], but a missing or null field yields `T::default()`.
pub fn field_or_default<T: DeserializeOwned + Default>(mut body: Value, field: &str) -> Result<T> {
    match body.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| RocketChatError::Decode(format!("invalid `{field}`: {e}"))),
    }
}

/// Deserializes the whole body (e.g. `*.counters`, `me`).
pub fn body<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| RocketChatError::Decode(e.to_string()))
}

/// Server error text from an error envelope: `error`, then `message`, then `errorType`.
pub fn error_text(body: &Value) -> Option<String> {
    ["error", "message", "errorType"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_missing_is_decode_error() {
        let err = field::<Vec<String>>(json!({"success": true}), "messages").unwrap_err();
        assert!(matches!(err, RocketChatError::Decode(_)));
    }

    #[test]
    fn test_field_or_default() {
        let values: Vec<String> = field_or_default(json!({"items": null}), "items").unwrap();
        assert!(values.is_empty());
        let values: Vec<String> = field_or_default(json!({"items": ["a"]}), "items").unwrap();
        assert_eq!(values, vec!["a".to_string()]);
    }

    #[test]
    fn test_error_text_precedence() {
        assert_eq!(
            error_text(&json!({"success": false, "error": "room-not-found", "message": "x"})),
            Some("room-not-found".to_string())
        );
        assert_eq!(
            error_text(&json!({"status": "error", "message": "You must be logged in"})),
            Some("You must be logged in".to_string())
        );
        assert_eq!(error_text(&json!({"success": false})), None);
    }
}
