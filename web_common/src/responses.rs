//! Server response bodies and the client error type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// Generic `{success, message, error}` body returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Best human-readable text for this response.
    pub fn text(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| if self.success { "Done".to_string() } else { "Unknown error".to_string() })
    }

    /// Interpret the body of a 2xx response. Only an explicit
    /// `"success": false` counts as a rejection; redirects to HTML pages
    /// and bodies without a `success` field are treated as accepted.
    pub fn from_body(body: &str) -> Result<ActionResponse, ApiError> {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) if value.get("success").is_some() => {
                serde_json::from_value::<ActionResponse>(value)
                    .map_err(|e| ApiError::Decode(e.to_string()))?
                    .into_result()
            }
            Ok(value) => Ok(ActionResponse {
                success: true,
                message: value.get("message").and_then(Value::as_str).map(str::to_string),
                error: None,
            }),
            Err(_) => Ok(ActionResponse { success: true, message: None, error: None }),
        }
    }

    /// Turn a `success: false` body into an error.
    pub fn into_result(self) -> Result<ActionResponse, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected(
                self.error.or(self.message).unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}

/// Body of a 2xx answer to a mutating JSON call. An empty body (204,
/// or a handler that returns nothing) is `Value::Null`, not an error.
pub fn mutation_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Every failure the client can observe while talking to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, aborted).
    Network(String),
    /// Non-2xx status with the message extracted from the body.
    Http { status: u16, message: String },
    /// Response body was not what the client expected.
    Decode(String),
    /// 2xx response carrying `success: false`.
    Rejected(String),
    /// A transport could not be used at all.
    Unavailable(String),
}

impl ApiError {
    /// Message without the category prefix, for alerts and inline status.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::Decode(msg)
            | ApiError::Rejected(msg)
            | ApiError::Unavailable(msg) => msg,
            ApiError::Http { message, .. } => message,
        }
    }

    /// Build an HTTP error from a status and the raw body text.
    pub fn from_http(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| extract_error_message(&v))
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('<'))
                    .then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        ApiError::Http { status, message }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ApiError::Network(ref msg) => write!(f, "Network error: {}", msg),
            ApiError::Http { status, ref message } => write!(f, "{} (HTTP {})", message, status),
            ApiError::Decode(ref msg) => write!(f, "Unexpected response: {}", msg),
            ApiError::Rejected(ref msg) => write!(f, "{}", msg),
            ApiError::Unavailable(ref msg) => write!(f, "Unavailable: {}", msg),
        }
    }
}

/// Field precedence for error bodies.
const ERROR_FIELDS: [&str; 4] = ["detail", "error", "message", "msg"];

/// Pull a readable message out of a heterogeneous error body.
///
/// Looks at `detail`, `error`, `message` and `msg` in that order. Arrays
/// (e.g. validation errors) are flattened one item per line.
pub fn extract_error_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) => non_empty(s),
        Value::Array(items) => flatten_items(items),
        Value::Object(map) => ERROR_FIELDS
            .iter()
            .filter_map(|field| map.get(*field))
            .find_map(|value| match value {
                Value::String(s) => non_empty(s),
                Value::Array(items) => flatten_items(items),
                Value::Object(_) => extract_error_message(value),
                Value::Null => None,
                other => Some(other.to_string()),
            }),
        _ => None,
    }
}

fn flatten_items(items: &[Value]) -> Option<String> {
    let lines: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => {
                let text = extract_error_message(item)?;
                match map.get("loc").and_then(Value::as_array) {
                    Some(loc) if !loc.is_empty() => {
                        let path = loc
                            .iter()
                            .map(|p| match p {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(".");
                        Some(format!("{}: {}", path, text))
                    }
                    _ => Some(text),
                }
            }
            other => extract_error_message(other).or_else(|| match other {
                Value::Null => None,
                v => Some(v.to_string()),
            }),
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_mutation_body_is_success() {
        assert_eq!(mutation_body(""), Ok(Value::Null));
        assert_eq!(mutation_body("  \n"), Ok(Value::Null));
        assert_eq!(mutation_body(r#"{"ok": true}"#), Ok(json!({"ok": true})));
        assert!(matches!(mutation_body("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn precedence_prefers_detail() {
        let body = json!({"msg": "m", "message": "message", "error": "err", "detail": "det"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("det"));

        let body = json!({"msg": "m", "message": "message"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("message"));
    }

    #[test]
    fn empty_fields_fall_through() {
        let body = json!({"detail": "", "error": null, "msg": "last resort"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("last resort"));
    }

    #[test]
    fn validation_arrays_flatten_to_lines() {
        let body = json!({"detail": [
            {"loc": ["body", "new_id"], "msg": "value is not a valid integer", "type": "type_error"},
            {"msg": "second problem"}
        ]});
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("body.new_id: value is not a valid integer\nsecond problem")
        );
    }

    #[test]
    fn http_error_falls_back_to_status() {
        let err = ApiError::from_http(502, "<html>bad gateway</html>");
        assert_eq!(err.message(), "HTTP 502");

        let err = ApiError::from_http(400, r#"{"detail": "Channel number already in use"}"#);
        assert_eq!(err.message(), "Channel number already in use");
        assert_eq!(err.to_string(), "Channel number already in use (HTTP 400)");
    }

    #[test]
    fn action_body_without_success_flag_is_accepted() {
        assert!(ActionResponse::from_body("<!doctype html><html></html>").is_ok());
        assert!(ActionResponse::from_body("").is_ok());
        let resp = ActionResponse::from_body(r#"{"message": "Stopped"}"#).unwrap();
        assert_eq!(resp.text(), "Stopped");
        assert_eq!(
            ActionResponse::from_body(r#"{"success": false, "message": "No channels"}"#),
            Err(ApiError::Rejected("No channels".into()))
        );
    }

    #[test]
    fn rejected_action_uses_error_then_message() {
        let resp = ActionResponse { success: false, message: Some("m".into()), error: Some("e".into()) };
        assert_eq!(resp.into_result(), Err(ApiError::Rejected("e".into())));

        let resp = ActionResponse { success: true, message: Some("ok".into()), error: None };
        assert_eq!(resp.into_result().map(|r| r.text()), Ok("ok".to_string()));
    }
}
