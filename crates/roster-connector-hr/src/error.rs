//! Error types for the HR connector.

use thiserror::Error;

/// Result type alias using `HrError`.
pub type HrResult<T> = Result<T, HrError>;

/// Errors that can occur when interacting with the HR API.
#[derive(Debug, Error)]
pub enum HrError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token acquisition failed.
    #[error("Unable to connect to HR API (status {status}): {body}")]
    Connection { status: u16, body: String },

    /// Remote token revoke failed. The session is closed locally regardless.
    #[error("Unable to perform remote disconnect with HR API (status {status}): {body}")]
    Disconnection { status: u16, body: String },

    /// A fetch call returned a non-2xx, non-204 status.
    #[error("Unable to complete HR API request (status {status}): {body}")]
    Request {
        status: u16,
        body: serde_json::Value,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HrError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HrError::Connection { status, .. }
            | HrError::Disconnection { status, .. }
            | HrError::Request { status, .. } => Some(*status),
            HrError::Http(e) => e.status().map(|s| s.as_u16()),
            HrError::Config(_) | HrError::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display_includes_body() {
        let err = HrError::Request {
            status: 401,
            body: serde_json::json!({"error": "invalid_token"}),
        };
        assert_eq!(
            err.to_string(),
            r#"Unable to complete HR API request (status 401): {"error":"invalid_token"}"#
        );
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_config_error_has_no_status() {
        assert_eq!(HrError::Config("bad".into()).status(), None);
    }
}
