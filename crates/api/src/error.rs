use serde_json::Value;
use thiserror::Error;
use voluum_types::{ErrorBody, codes};

/// Normalized failure produced by [`crate::VoluumClient`].
///
/// Carries an optional machine code, the HTTP status when a response
/// was obtained, and the parsed response body as `details`. Transport
/// failures (DNS, connect, timeout, request construction) are collapsed
/// into the reserved `NETWORK_ERROR` code with the underlying error
/// attached as the source.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: Option<String>,
    pub status: Option<u16>,
    pub details: Option<Value>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ApiError {
    /// Classify a non-2xx HTTP response. The error code is probed from
    /// the parsed body; the body itself is preserved as `details`.
    pub fn http(status: u16, details: Value) -> Self {
        Self {
            message: format!("Voluum API request failed ({status})"),
            code: extract_error_code(&details),
            status: Some(status),
            details: Some(details),
            source: None,
        }
    }

    /// Normalize a transport-level or request-construction failure.
    pub fn network<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: format!("Network/request failure: {source}"),
            code: Some(codes::NETWORK_ERROR.to_string()),
            status: None,
            details: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn is_network(&self) -> bool {
        self.code.as_deref() == Some(codes::NETWORK_ERROR)
    }

    /// Convert into the serializable record used by failure envelopes.
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            message: self.message.clone(),
            code: self.code.clone(),
            status: self.status,
            details: self.details.clone(),
        }
    }
}

/// Probe a parsed error body for a `code` or `errorCode` string field.
///
/// Only the first two levels are inspected: the top-level object first,
/// then each directly nested object in key order. Anything deeper is
/// upstream detail we do not chase.
fn extract_error_code(details: &Value) -> Option<String> {
    let top = details.as_object()?;
    if let Some(code) = string_field(top, "code").or_else(|| string_field(top, "errorCode")) {
        return Some(code);
    }

    for nested in top.values() {
        if let Some(nested) = nested.as_object()
            && let Some(code) = string_field(nested, "code").or_else(|| string_field(nested, "errorCode"))
        {
            return Some(code);
        }
    }

    None
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn http_error_extracts_top_level_code() {
        let error = ApiError::http(403, json!({"code": "FORBIDDEN", "reason": "nope"}));

        assert_eq!(error.message, "Voluum API request failed (403)");
        assert_eq!(error.code.as_deref(), Some("FORBIDDEN"));
        assert_eq!(error.status, Some(403));
        assert_eq!(error.details, Some(json!({"code": "FORBIDDEN", "reason": "nope"})));
    }

    #[test]
    fn http_error_falls_back_to_error_code_field() {
        let error = ApiError::http(400, json!({"errorCode": "BAD_INPUT"}));
        assert_eq!(error.code.as_deref(), Some("BAD_INPUT"));
    }

    #[test]
    fn http_error_probes_one_nested_level() {
        let error = ApiError::http(422, json!({"error": {"code": "VALIDATION"}}));
        assert_eq!(error.code.as_deref(), Some("VALIDATION"));

        let too_deep = ApiError::http(422, json!({"a": {"b": {"code": "HIDDEN"}}}));
        assert!(too_deep.code.is_none());
    }

    #[test]
    fn http_error_ignores_blank_and_non_string_codes() {
        assert!(ApiError::http(500, json!({"code": "  "})).code.is_none());
        assert!(ApiError::http(500, json!({"code": 42})).code.is_none());
        assert!(ApiError::http(500, json!(["code"])).code.is_none());
    }

    #[test]
    fn network_error_carries_reserved_code_and_source() {
        let source = std::io::Error::other("connection refused");
        let error = ApiError::network(source);

        assert!(error.is_network());
        assert_eq!(error.status, None);
        assert!(error.message.contains("connection refused"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn error_body_mirrors_fields() {
        let error = ApiError::http(404, json!({"errorCode": "NOT_FOUND"}));
        let body = error.to_error_body();

        assert_eq!(body.message, "Voluum API request failed (404)");
        assert_eq!(body.code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(body.status, Some(404));
    }
}
