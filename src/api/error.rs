//! Mapping of [`Error`] onto HTTP responses.
//!
//! Failures keep the `{"error": "..."}` body the front end already understands, with a status
//! code matching the kind of failure. Database errors are logged in full and reported to the
//! client without internals.

use crate::errors::{Error, Result};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{error, warn};

/// Handler error wrapper
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl ApiError {
    /// Status code and client-facing message for this error.
    fn parts(&self) -> (StatusCode, String) {
        match &self.0 {
            Error::Validation { violations } => (StatusCode::BAD_REQUEST, violations.join("; ")),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            Error::Database(e) => {
                error!("Database error while handling request: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal database error".to_string(),
                )
            }
            other => {
                error!("Unexpected error while handling request: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }

    /// Response in the `{"success": false, "error": ...}` shape used by the payment screen.
    pub fn into_payment_response(self) -> Response {
        let (status, message) = self.parts();
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Unwraps a JSON body, turning a missing or malformed body into a validation error.
pub fn body_value(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            Err(Error::invalid(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}

/// Decodes a JSON value into a typed request struct.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::invalid(format!("Invalid request body: {e}")))
}

/// Parses a required integer query parameter.
pub fn parse_id(raw: Option<&str>, field: &str) -> Result<i64> {
    let raw = raw.ok_or_else(|| Error::invalid(format!("{field} is required")))?;
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid(format!("{field} must be an integer (got \"{raw}\")")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError(Error::Validation {
            violations: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(err.parts(), (StatusCode::BAD_REQUEST, "a; b".to_string()));
    }

    #[test]
    fn test_database_error_is_redacted() {
        let err = ApiError(Error::Database(sea_orm::DbErr::Custom(
            "disk I/O error at /var/lib/laundry".to_string(),
        )));
        let (status, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("/var/lib"));
    }

    #[test]
    fn test_parse_id() {
        assert!(matches!(parse_id(Some(" 12 "), "user_id"), Ok(12)));
        assert!(matches!(
            parse_id(None, "user_id"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_id(Some("twelve"), "user_id"),
            Err(Error::Validation { .. })
        ));
    }
}
