//! Error bodies returned by the backend.

use serde::Deserialize;
use serde_json::Value;

/// `{"detail": ...}` error envelope.
///
/// `detail` is usually a string; validation failures carry a list of
/// `{"loc": [...], "msg": "..."}` objects instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Human-readable message extracted from `detail`, if any.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Object(obj) => obj.get("msg").and_then(Value::as_str).map(str::to_string),
                        Value::String(s) => Some(s.clone()),
                        _ => None,
                    })
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Session not found"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Session not found"));
    }

    #[test]
    fn test_validation_detail() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","title"],"msg":"field required"},{"msg":"too short"}]}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("field required; too short"));
    }

    #[test]
    fn test_missing_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert!(body.message().is_none());
    }
}
