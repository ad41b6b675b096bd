pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g. 1012)
/// - `error`: machine-readable identifier (e.g. "BAD_REQUEST")
/// - `message`: human-readable message
/// - `details`: optional structured details
///
/// ```json
/// {
///   "code": 1012,
///   "error": "BAD_REQUEST",
///   "message": "invalid email: not-an-email",
///   "details": { "kind": "INVALID_EMAIL" }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Store decode error: {0}")]
    StoreDecode(String),

    #[error("{source}")]
    Detailed {
        source: Box<AppError>,
        details: serde_json::Value,
    },
}

impl AppError {
    /// Attach structured details rendered in the response's `details` field.
    pub fn with_details(self, details: serde_json::Value) -> Self {
        AppError::Detailed {
            source: Box::new(self),
            details,
        }
    }

    /// Resolve the status, message, details and code, logging once per error.
    fn into_parts(self) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
        match self {
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::MethodNotAllowed(msg) => {
                tracing::info!("Method not allowed: {}", msg);
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    msg,
                    None,
                    ErrorCode::MethodNotAllowed,
                )
            }
            AppError::Store(msg) => {
                tracing::error!(error_code = ErrorCode::StoreError.code(), "Store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    None,
                    ErrorCode::StoreError,
                )
            }
            AppError::StoreDecode(msg) => {
                tracing::error!(
                    error_code = ErrorCode::StoreDecode.code(),
                    "Store decode error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    None,
                    ErrorCode::StoreDecode,
                )
            }
            AppError::Detailed { source, details } => {
                let (status, message, _, code) = source.into_parts();
                (status, message, Some(details), code)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = self.into_parts();

        let body = Json(ErrorResponse {
            details,
            ..ErrorResponse::new(code, message)
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_envelope() {
        let response = AppError::BadRequest("invalid email".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.code, 1012);
        assert_eq!(body.error, "BAD_REQUEST");
        assert_eq!(body.message, "invalid email");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_store_error_is_internal() {
        let response = AppError::Store("timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.error, "STORE_ERROR");
    }

    #[tokio::test]
    async fn test_detailed_keeps_status_and_adds_details() {
        let response = AppError::BadRequest("user already exists".to_string())
            .with_details(json!({ "kind": "USER_ALREADY_EXISTS" }))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.message, "user already exists");
        assert_eq!(body.details, Some(json!({ "kind": "USER_ALREADY_EXISTS" })));
    }

    #[test]
    fn test_detailed_display_is_transparent() {
        let err = AppError::NotFound("x".to_string()).with_details(json!({}));
        assert_eq!(err.to_string(), "Not Found: x");
    }
}
