//! Outcome classification for a single HTTP attempt.

use serde_json::{Map, Value, json};

use super::transport::RawResponse;
use crate::error::{ApiError, BoxError, Error, RequestError};

/// What one attempt amounted to.
#[derive(Debug)]
pub enum Attempt {
    /// Decoded success payload, always a JSON object.
    Succeeded(Value),
    /// Transient failure; worth another attempt if budget remains.
    Retryable(Error),
    /// Permanent failure; surfaced as is.
    Failed(Error),
}

/// Transport failures and 5xx statuses are retryable. Every other status
/// outside 2xx fails immediately, as does a 2xx body reporting
/// `"success": false`.
pub fn classify(result: Result<RawResponse, BoxError>) -> Attempt {
    let response = match result {
        Ok(response) => response,
        Err(e) => return Attempt::Retryable(Error::Request(RequestError::new(e))),
    };

    let status = response.status;
    if status == 204 {
        return Attempt::Succeeded(Value::Object(Map::new()));
    }

    let payload = decode_body(&response.body);

    if status >= 500 {
        return Attempt::Retryable(ApiError::from_payload(status, &payload).into());
    }
    if !(200..=299).contains(&status) {
        return Attempt::Failed(ApiError::from_payload(status, &payload).into());
    }
    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        return Attempt::Failed(ApiError::from_payload(status, &payload).into());
    }

    match payload {
        Value::Object(_) => Attempt::Succeeded(payload),
        other => Attempt::Succeeded(json!({ "data": other })),
    }
}

/// Parses a body as JSON. Plain-text bodies are wrapped as `{"message": ...}`
/// and empty bodies become `{}`.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "message": body }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(status: u16, body: &str) -> Result<RawResponse, BoxError> {
        Ok(RawResponse::new(status, body))
    }

    #[test]
    fn test_success_object_passes_through() {
        let attempt = classify(ok(200, r#"{"success": true, "data": {"id": "lnk_1"}}"#));
        match attempt {
            Attempt::Succeeded(v) => assert_eq!(v["data"]["id"], "lnk_1"),
            other => panic!("Expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_success_non_object_is_wrapped() {
        let attempt = classify(ok(200, r#"[{"id": "lnk_1"}]"#));
        match attempt {
            Attempt::Succeeded(v) => assert_eq!(v["data"][0]["id"], "lnk_1"),
            other => panic!("Expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_no_content_is_empty_object() {
        assert!(matches!(
            classify(ok(204, "")),
            Attempt::Succeeded(Value::Object(ref m)) if m.is_empty()
        ));
    }

    #[test]
    fn test_server_error_is_retryable() {
        for status in [500, 502, 503, 504] {
            match classify(ok(status, r#"{"message": "server error"}"#)) {
                Attempt::Retryable(Error::Api(e)) => {
                    assert_eq!(e.status_code, status);
                    assert_eq!(e.message, "server error");
                }
                other => panic!("Expected retryable for {}, got {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_client_errors_fail_immediately() {
        for status in [400, 401, 403, 404, 409, 422, 429] {
            assert!(
                matches!(classify(ok(status, "{}")), Attempt::Failed(Error::Api(_))),
                "status {} should not be retried",
                status
            );
        }
    }

    #[test]
    fn test_redirect_and_informational_statuses_fail() {
        for status in [100, 300, 301, 302, 304, 307] {
            match classify(ok(status, r#"{"id": "lnk_x"}"#)) {
                Attempt::Failed(Error::Api(e)) => assert_eq!(e.status_code, status),
                other => panic!("Expected failure for {}, got {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_unsuccessful_body_fails() {
        let attempt = classify(ok(200, r#"{"success": false, "code": "QUOTA", "message": "limit"}"#));
        match attempt {
            Attempt::Failed(Error::Api(e)) => {
                assert_eq!(e.status_code, 200);
                assert_eq!(e.error_code.as_deref(), Some("QUOTA"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_error_body() {
        match classify(ok(502, "Bad Gateway")) {
            Attempt::Retryable(Error::Api(e)) => assert_eq!(e.message, "Bad Gateway"),
            other => panic!("Expected retryable, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_is_retryable() {
        let err: BoxError = Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ));
        assert!(matches!(classify(Err(err)), Attempt::Retryable(Error::Request(_))));
    }
}
