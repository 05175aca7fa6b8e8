//! Classification of service responses into success or reported failure.
//!
//! # Design
//! - The service reports some errors with a 2xx status and an `error` or
//!   `errors` field, so the status code alone is not enough.
//! - Handlers branch on [`ApiOutcome`] instead of probing raw JSON keys.

use std::fmt::{self, Display, Formatter};

use reqwest::StatusCode;
use serde_json::Value;

/// Result of a call the service answered.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    /// The service accepted the request.
    Success(T),
    /// The service reported an error.
    Failure(ServiceFailure),
}

impl<T> ApiOutcome<T> {
    /// Convert into a plain `Result`.
    ///
    /// # Errors
    ///
    /// Returns the service failure when the outcome is not a success.
    pub fn into_result(self) -> Result<T, ServiceFailure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }
}

/// Error reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    /// HTTP status code of the response.
    pub status: u16,
    /// Message extracted from the response body.
    pub message: String,
}

impl ServiceFailure {
    /// Inspect a decoded response and return the failure it reports, if any.
    #[must_use]
    pub fn detect(status: StatusCode, body: &Value) -> Option<Self> {
        let reported = reported_error(body);
        if status.is_success() {
            return reported.map(|message| Self {
                status: status.as_u16(),
                message,
            });
        }
        let message = reported
            .or_else(|| non_empty_str(body.get("message")))
            .or_else(|| match body {
                Value::Null => None,
                Value::String(text) if text.trim().is_empty() => None,
                Value::String(text) => Some(text.trim().to_string()),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Some(Self {
            status: status.as_u16(),
            message,
        })
    }
}

impl Display for ServiceFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} (status {})", self.message, self.status)
    }
}

fn reported_error(body: &Value) -> Option<String> {
    if let Some(message) = body.get("error").and_then(error_message) {
        return Some(message);
    }
    match body.get("errors") {
        Some(Value::Array(items)) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map_or_else(|| item.to_string(), str::to_string)
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => non_empty_str(other),
    }
}

/// Any `error` value other than null, blank text or `false` marks a failure.
fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(_) => non_empty_str(Some(error)),
        Value::Object(fields) => Some(
            non_empty_str(fields.get("message")).unwrap_or_else(|| error.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clean_success_has_no_failure() {
        assert!(ServiceFailure::detect(StatusCode::OK, &json!({"token": "t"})).is_none());
        assert!(ServiceFailure::detect(StatusCode::OK, &json!({"error": ""})).is_none());
        assert!(ServiceFailure::detect(StatusCode::OK, &json!({"errors": []})).is_none());
        assert!(ServiceFailure::detect(StatusCode::OK, &json!({"error": null})).is_none());
        assert!(ServiceFailure::detect(StatusCode::OK, &json!({"error": false})).is_none());
    }

    #[test]
    fn error_field_on_success_status_is_a_failure() {
        let failure = ServiceFailure::detect(StatusCode::OK, &json!({"error": "job not found"}))
            .expect("reported failure");
        assert_eq!(failure.message, "job not found");
        assert_eq!(failure.status, 200);
    }

    #[test]
    fn structured_error_object_is_a_failure() {
        let failure = ServiceFailure::detect(
            StatusCode::OK,
            &json!({"error": {"message": "job not found", "code": 404}}),
        )
        .expect("reported failure");
        assert_eq!(failure.message, "job not found");

        let failure = ServiceFailure::detect(StatusCode::OK, &json!({"error": {"code": 7}}))
            .expect("reported failure");
        assert_eq!(failure.message, r#"{"code":7}"#);
    }

    #[test]
    fn boolean_error_flag_is_a_failure() {
        let failure =
            ServiceFailure::detect(StatusCode::OK, &json!({"error": true, "results": []}))
                .expect("reported failure");
        assert_eq!(failure.message, "true");
        assert_eq!(failure.status, 200);
    }

    #[test]
    fn errors_array_is_joined() {
        let failure = ServiceFailure::detect(
            StatusCode::BAD_REQUEST,
            &json!({"errors": ["bad sql", {"code": 3}]}),
        )
        .expect("reported failure");
        assert_eq!(failure.message, r#"bad sql; {"code":3}"#);
        assert_eq!(failure.to_string(), r#"bad sql; {"code":3} (status 400)"#);
    }

    #[test]
    fn non_success_without_body_uses_reason_phrase() {
        let failure = ServiceFailure::detect(StatusCode::UNAUTHORIZED, &Value::Null)
            .expect("status failure");
        assert_eq!(failure.message, "Unauthorized");
    }

    #[test]
    fn non_success_with_plain_text_keeps_text() {
        let failure = ServiceFailure::detect(
            StatusCode::BAD_GATEWAY,
            &Value::String("upstream down\n".into()),
        )
        .expect("status failure");
        assert_eq!(failure.message, "upstream down");
    }

    #[test]
    fn outcome_converts_into_result() {
        let ok: ApiOutcome<u8> = ApiOutcome::Success(1);
        assert_eq!(ok.into_result(), Ok(1));
        let failed: ApiOutcome<u8> = ApiOutcome::Failure(ServiceFailure {
            status: 500,
            message: "boom".into(),
        });
        assert!(failed.into_result().is_err());
    }
}
