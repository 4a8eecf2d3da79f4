//! Stable error codes carried in every error body.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
//! assert_eq!(ErrorCode::ValidationError.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};

/// Error identifiers shared by all services.
///
/// Ranges: 1000-1099 request errors, 1100-1199 authentication,
/// 1500-1599 server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request validation failed
    ValidationError,
    /// Path parameter could not be parsed
    InvalidPathParameter,
    /// Request body could not be read as JSON
    JsonExtraction,
    /// Path id and body id disagree
    IdMismatch,
    NotFound,
    Conflict,

    /// Missing, malformed, or expired credentials
    Unauthorized,
    /// Authenticated but not allowed
    Forbidden,
    /// Username/password pair rejected
    InvalidCredentials,

    InternalError,
    ServiceUnavailable,
}

impl ErrorCode {
    /// Machine-readable identifier for clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidPathParameter => "INVALID_PATH_PARAMETER",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::IdMismatch => "ID_MISMATCH",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code used in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidPathParameter => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Conflict => 1008,
            Self::IdMismatch => 1012,
            Self::Unauthorized => 1101,
            Self::Forbidden => 1102,
            Self::InvalidCredentials => 1103,
            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidPathParameter => "Invalid path parameter",
            Self::JsonExtraction => "Failed to parse request body",
            Self::IdMismatch => "Path id does not match body id",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource was modified concurrently",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::InvalidCredentials => "Invalid username or password",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
