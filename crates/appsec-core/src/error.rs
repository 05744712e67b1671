//! Error types for Application Security API operations.
//!
//! Two layers: [`Error`] is the enum every client operation returns, and
//! [`ApiError`] is the problem-detail object the API sends with non-2xx
//! responses.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

/// Main error type for Application Security API operations.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    /// A request failed struct validation before any network call was made
    #[error("struct validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The API rejected the call with a problem-detail error body
    #[error(transparent)]
    Api(#[from] ApiError),

    /// HTTP request construction or network failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Operation timed out
    #[error("timeout waiting for response: {0}")]
    Timeout(String),

    /// The API endpoint could not be reached
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A 2xx response body could not be deserialized
    #[error("failed to deserialize response: {0}")]
    Deserialize(String),

    /// Invalid base URL or request path
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Client configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Specialized result type for Application Security API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Problem-detail error returned by the Application Security API.
///
/// Matches the `{type, title, detail, instance}` shape documented for the
/// API, with the HTTP status code of the failed response attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// Machine-readable error type
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable summary
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Detailed explanation of this occurrence
    pub detail: String,

    /// URI identifying the specific occurrence
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance: String,

    /// HTTP status code of the failed response
    #[serde(rename = "statusCode", skip_deserializing)]
    pub status_code: u16,
}

impl ApiError {
    /// Build an [`ApiError`] from a failed response's status and body.
    ///
    /// Attempts to decode the body as a problem-detail object; if that fails
    /// the raw body is preserved in `detail` under a generic title. The real
    /// HTTP status code is attached in either case.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let mut error: Self = serde_json::from_str(body).unwrap_or_else(|_| Self {
            title: "Failed to unmarshal error body".to_string(),
            detail: body.to_string(),
            ..Self::default()
        });
        error.status_code = status.as_u16();
        error
    }

    /// Build an [`ApiError`] for a response whose body could not be read.
    #[must_use]
    pub fn from_unreadable_body(status: StatusCode, cause: &str) -> Self {
        Self {
            title: "Failed to read error body".to_string(),
            detail: cause.to_string(),
            status_code: status.as_u16(),
            ..Self::default()
        }
    }

    /// Returns true if the API reported a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code == StatusCode::NOT_FOUND.as_u16()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => write!(f, "API error:\n{json}"),
            Err(err) => write!(f, "error marshaling API error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

// Two API errors match when they carry the same status code and render to
// the same message, so tests can compare errors by value.
impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.status_code == other.status_code && self.to_string() == other.to_string()
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_from_problem_detail_body() {
        let body = r#"{
            "type": "internal_error",
            "title": "Internal Server Error",
            "detail": "Error fetching properties",
            "status": 500
        }"#;

        let error = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(error.error_type, "internal_error");
        assert_eq!(error.title, "Internal Server Error");
        assert_eq!(error.detail, "Error fetching properties");
        assert_eq!(error.status_code, 500);
    }

    #[test]
    fn api_error_from_malformed_body_keeps_status() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>nope</html>");
        assert_eq!(error.status_code, 502);
        assert_eq!(error.title, "Failed to unmarshal error body");
        assert_eq!(error.detail, "<html>nope</html>");
    }

    #[test]
    fn api_error_from_unreadable_body() {
        let error =
            ApiError::from_unreadable_body(StatusCode::INTERNAL_SERVER_ERROR, "connection reset");
        assert_eq!(error.status_code, 500);
        assert_eq!(error.title, "Failed to read error body");
        assert_eq!(error.detail, "connection reset");
    }

    #[test]
    fn api_error_equality_is_status_plus_message() {
        let a = ApiError {
            error_type: "internal_error".to_string(),
            title: "Internal Server Error".to_string(),
            detail: "boom".to_string(),
            status_code: 500,
            ..ApiError::default()
        };
        let b = a.clone();
        assert_eq!(a, b);

        let mut different_status = a.clone();
        different_status.status_code = 503;
        assert_ne!(a, different_status);

        let mut different_detail = a.clone();
        different_detail.detail = "other".to_string();
        assert_ne!(a, different_detail);
    }

    #[test]
    fn api_error_display_renders_problem_detail() {
        let error = ApiError {
            error_type: "internal_error".to_string(),
            title: "Internal Server Error".to_string(),
            detail: "boom".to_string(),
            status_code: 500,
            ..ApiError::default()
        };

        let rendered = error.to_string();
        assert!(rendered.starts_with("API error:"));
        assert!(rendered.contains("internal_error"));
        assert!(rendered.contains("\"statusCode\": 500"));
    }

    #[test]
    fn api_error_is_not_found() {
        let error = ApiError::from_response(StatusCode::NOT_FOUND, "{}");
        assert!(error.is_not_found());
        assert!(!ApiError::from_response(StatusCode::FORBIDDEN, "{}").is_not_found());
    }

    #[test]
    fn error_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let error: Error = err.into();
        assert!(matches!(error, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn error_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: Error = err.into();
        assert!(matches!(error, Error::Deserialize(_)));
    }

    #[test]
    fn error_display() {
        let error = Error::Transport("socket closed".to_string());
        assert_eq!(error.to_string(), "request failed: socket closed");

        let error = Error::ServiceUnavailable("appsec".to_string());
        assert_eq!(error.to_string(), "service unavailable: appsec");
    }
}
