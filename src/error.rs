//! Error types returned by every client operation.

use serde_json::Value;

/// Boxed transport failure, as produced by a [`crate::http::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing client configuration, raised by the builder.
    #[error("configuration error: {0}")]
    Config(String),

    /// The API answered with an error status or an unsuccessful body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A caller-supplied argument cannot be turned into a request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced an HTTP response.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A successful response could not be mapped to the result model.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// HTTP status of an API error, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.status_code),
            _ => None,
        }
    }
}

/// HTTP error returned by the API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("HTTP {}{}: {}", .status_code, code_suffix(.error_code), .message)]
pub struct ApiError {
    pub status_code: u16,
    pub error_code: Option<String>,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    /// Normalizes an error payload into an `ApiError`.
    ///
    /// The API is not consistent about where it puts the message and code, so
    /// the top level is checked first, then a nested `error` object.
    pub fn from_payload(status_code: u16, payload: &Value) -> Self {
        let Some(obj) = payload.as_object() else {
            return Self {
                status_code,
                error_code: None,
                message: payload.to_string(),
                details: None,
            };
        };

        let nested = obj.get("error").and_then(Value::as_object);
        let message = obj
            .get("message")
            .and_then(non_empty_str)
            .or_else(|| nested.and_then(|e| e.get("message")).and_then(non_empty_str))
            .or_else(|| obj.get("error_description").and_then(non_empty_str))
            .unwrap_or("Request failed")
            .to_string();
        let error_code = obj
            .get("code")
            .and_then(non_empty_str)
            .or_else(|| obj.get("errorCode").and_then(non_empty_str))
            .or_else(|| nested.and_then(|e| e.get("code")).and_then(non_empty_str))
            .map(str::to_string);
        let details = obj.get("details").filter(|d| d.is_object()).cloned();

        Self {
            status_code,
            error_code,
            message,
            details,
        }
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({})", c)).unwrap_or_default()
}

/// Network or transport failure when calling the API.
#[derive(Debug, thiserror::Error)]
#[error("request failed: {source}")]
pub struct RequestError {
    #[source]
    source: BoxError,
}

impl RequestError {
    /// Wraps the underlying transport failure.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Returns true if the failure was a timeout of any of the configured kinds.
    pub fn is_timeout(&self) -> bool {
        match self.source.downcast_ref::<reqwest::Error>() {
            Some(e) => e.is_timeout(),
            None => self
                .source
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::TimedOut),
        }
    }

    /// Returns true if the failure happened while establishing the connection.
    pub fn is_connect(&self) -> bool {
        match self.source.downcast_ref::<reqwest::Error>() {
            Some(e) => e.is_connect(),
            None => self.source.downcast_ref::<std::io::Error>().is_some_and(|e| {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::ConnectionAborted
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_from_top_level_fields() {
        let payload = json!({
            "success": false,
            "code": "SLUG_EXISTS",
            "message": "The slug is already in use.",
        });
        let err = ApiError::from_payload(409, &payload);
        assert_eq!(err.status_code, 409);
        assert_eq!(err.error_code.as_deref(), Some("SLUG_EXISTS"));
        assert_eq!(err.message, "The slug is already in use.");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_api_error_from_nested_error_object() {
        let payload = json!({
            "error": {"code": "NOT_FOUND", "message": "Link not found"},
            "details": {"id": "lnk_missing"},
        });
        let err = ApiError::from_payload(404, &payload);
        assert_eq!(err.error_code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(err.message, "Link not found");
        assert_eq!(err.details, Some(json!({"id": "lnk_missing"})));
    }

    #[test]
    fn test_api_error_fallbacks() {
        let payload = json!({"error_description": "bad key", "errorCode": "AUTH"});
        let err = ApiError::from_payload(401, &payload);
        assert_eq!(err.message, "bad key");
        assert_eq!(err.error_code.as_deref(), Some("AUTH"));

        let err = ApiError::from_payload(500, &json!({}));
        assert_eq!(err.message, "Request failed");
        assert!(err.error_code.is_none());

        let err = ApiError::from_payload(502, &json!("upstream down"));
        assert_eq!(err.message, "\"upstream down\"");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::from_payload(409, &json!({"code": "SLUG_EXISTS", "message": "taken"}));
        assert_eq!(err.to_string(), "HTTP 409 (SLUG_EXISTS): taken");

        let err = ApiError::from_payload(500, &json!({"message": "boom"}));
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn test_error_status_code() {
        let err = Error::from(ApiError::from_payload(404, &json!({})));
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(Error::Config("x".into()).status_code(), None);
    }

    #[test]
    fn test_request_error_classification() {
        let err = RequestError::new(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"));
        assert!(err.is_timeout());
        assert!(!err.is_connect());

        let err = RequestError::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(err.is_connect());
        assert!(std::error::Error::source(&err).is_some());
    }
}
