//! Error types for FortiOS operations.
//!
//! This module provides the error type shared by every FortiOS crate, including
//! HTTP status mapping and decoding of the numeric error codes FortiOS places in
//! its response envelope.

use thiserror::Error;

/// Main error type for FortiOS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// FortiOS is unreachable or temporarily refusing requests
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Authentication or authorisation was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Failed to parse a FortiOS response
    #[error("Failed to parse FortiOS response: {0}")]
    ResponseParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Conflict error (duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Error reported by FortiOS through its response envelope
    #[error("FortiOS API error {http_status} (code {code}): {message}")]
    ApiError {
        /// HTTP status reported by FortiOS
        http_status: u16,
        /// FortiOS internal error code (negative integer, 0 when absent)
        code: i64,
        /// Error message
        message: String,
    },

    /// Reference cache error
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for FortiOS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// FortiOS error code returned when an entry already exists.
pub const FORTIOS_DUPLICATE_ENTRY: i64 = -5;

/// FortiOS error code returned when an entry does not exist.
pub const FORTIOS_ENTRY_NOT_FOUND: i64 = -3;

/// Describe a FortiOS numeric error code.
///
/// Returns `None` for codes this crate has no description for.
#[must_use]
pub const fn describe_fortios_code(code: i64) -> Option<&'static str> {
    match code {
        -1 => Some("Invalid length of value"),
        -2 => Some("Index value out of range"),
        -3 => Some("Entry not found"),
        -4 => Some("Maximum number of entries has been reached"),
        -5 => Some("A duplicate entry already exists"),
        -7 => Some("Value conflicts with system settings"),
        -8 => Some("Invalid IP address"),
        -9 => Some("Invalid IP netmask"),
        -15 => Some("Invalid value"),
        -23 => Some("Entry is in use and cannot be deleted"),
        -37 => Some("Permission denied"),
        -651 => Some("Input value is invalid"),
        _ => None,
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Self::ResponseParseError(_) => "RESPONSE_PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ApiError { .. } => "API_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true if a failed request should be logged at warn level
    /// rather than debug.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_)
                | Self::ApiError { .. }
                | Self::AuthenticationFailed(_)
                | Self::ResponseParseError(_)
                | Self::Timeout(_)
                | Self::ServiceUnavailable(_)
                | Self::HttpError(_)
        )
    }

    /// Returns true if the failed request may succeed when retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ResponseParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
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
        Self::ResponseParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::ValidationError(format!("invalid UUID: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::AuthenticationFailed("test".to_string()).error_code(),
            "AUTHENTICATION_FAILED"
        );
        assert_eq!(
            Error::ResponseParseError("test".to_string()).error_code(),
            "RESPONSE_PARSE_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(
            Error::ApiError {
                http_status: 424,
                code: -23,
                message: "in use".to_string()
            }
            .error_code(),
            "API_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("firewall/address/web".to_string());
        assert_eq!(err.to_string(), "Not found: firewall/address/web");

        let err = Error::ApiError {
            http_status: 500,
            code: -651,
            message: "Input value is invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "FortiOS API error 500 (code -651): Input value is invalid"
        );
    }

    #[test]
    fn test_should_log() {
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::Timeout("test".to_string()).should_log());
        assert!(!Error::Conflict("test".to_string()).should_log());
        assert!(!Error::NotFound("test".to_string()).should_log());
        assert!(!Error::ValidationError("test".to_string()).should_log());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout("t".to_string()).is_retryable());
        assert!(Error::ServiceUnavailable("t".to_string()).is_retryable());
        assert!(!Error::NotFound("t".to_string()).is_retryable());
        assert!(!Error::Conflict("t".to_string()).is_retryable());
    }

    #[test]
    fn test_describe_fortios_code() {
        assert_eq!(
            describe_fortios_code(FORTIOS_ENTRY_NOT_FOUND),
            Some("Entry not found")
        );
        assert_eq!(
            describe_fortios_code(FORTIOS_DUPLICATE_ENTRY),
            Some("A duplicate entry already exists")
        );
        assert_eq!(describe_fortios_code(-9999), None);
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_uuid_error() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::ValidationError(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::ResponseParseError(_)));
    }
}
