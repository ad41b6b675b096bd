//! Type-safe error codes for API responses.
//!
//! Each error code has:
//! - a string identifier for clients (e.g. "BAD_REQUEST")
//! - an integer code for logs and monitoring (e.g. 1012)
//! - a default human-readable message
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::StoreError;
//! assert_eq!(code.as_str(), "STORE_ERROR");
//! assert_eq!(code.code(), 2001);
//! assert_eq!(code.default_message(), "A storage error occurred");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Payload or business rule rejected the request
    BadRequest,

    /// Requested route was not found
    NotFound,

    /// HTTP method is not supported by the resource
    MethodNotAllowed,

    // Storage errors (2000-2999)
    /// A backing store call failed
    StoreError,

    /// A stored record could not be decoded
    StoreDecode,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::StoreError => "STORE_ERROR",
            Self::StoreDecode => "STORE_DECODE",
        }
    }

    /// Integer code for logging and monitoring.
    ///
    /// Ranges:
    /// - 1000-1999: client errors
    /// - 2000-2999: storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound => 1004,
            Self::BadRequest => 1012,
            Self::MethodNotAllowed => 1013,

            Self::StoreError => 2001,
            Self::StoreDecode => 2002,
        }
    }

    /// Default user-facing message; handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "Method not allowed",
            Self::StoreError => "A storage error occurred",
            Self::StoreDecode => "Failed to decode stored record",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
