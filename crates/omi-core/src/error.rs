//! Error types for Omi API operations.
//!
//! HTTP failures are collapsed into a small taxonomy keyed on status code.
//! Failures without an HTTP response (connection refused, timeouts) are kept
//! as the underlying transport error.

use thiserror::Error;

/// Result type alias for Omi operations.
pub type OmiResult<T> = Result<T, OmiError>;

/// Seconds to wait when a 429 carries no usable `retry-after` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Main error type for all Omi operations.
#[derive(Error, Debug)]
pub enum OmiError {
    /// The API token was rejected (HTTP 401).
    #[error("Unauthorized: Invalid API token")]
    Unauthorized,

    /// The token lacks permission for the resource (HTTP 403).
    #[error("Forbidden: Insufficient permissions")]
    Forbidden,

    /// The server is throttling us (HTTP 429).
    #[error("Rate limited. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Generic server failure (HTTP 500).
    #[error("Internal server error")]
    ServerError,

    /// Any other non-success status.
    #[error("API error: {status}")]
    Api { status: u16 },

    /// Connection-level failure with no HTTP response. Never remapped.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A tool call omitted a required argument.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Tool call arguments were present but malformed.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The response body was not the JSON we expected.
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthInvalidToken,
    AuthForbidden,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // Remote API (API_xxx)
    ApiServerError,
    ApiUnexpectedStatus,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Validation (VAL_xxx)
    ValMissingField,
    ValInvalidInput,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Configuration (CFG_xxx)
    CfgInvalid,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalidToken => "AUTH_001",
            ErrorCode::AuthForbidden => "AUTH_002",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::ApiServerError => "API_001",
            ErrorCode::ApiUnexpectedStatus => "API_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ValMissingField => "VAL_001",
            ErrorCode::ValInvalidInput => "VAL_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::CfgInvalid => "CFG_001",
        }
    }
}

impl OmiError {
    /// Map a non-success HTTP status to the error taxonomy.
    ///
    /// `retry_after` is only consulted for 429 and falls back to
    /// [`DEFAULT_RETRY_AFTER_SECS`].
    pub fn from_status(status: u16, retry_after: Option<u64>) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            429 => Self::RateLimited {
                retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            500 => Self::ServerError,
            _ => Self::Api { status },
        }
    }

    /// Create a missing-field validation error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::RateLimited { .. } => Some(429),
            Self::ServerError => Some(500),
            Self::Api { status } => Some(*status),
            _ => None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized => ErrorCode::AuthInvalidToken,
            Self::Forbidden => ErrorCode::AuthForbidden,
            Self::RateLimited { .. } => ErrorCode::RateLimitExceeded,
            Self::ServerError => ErrorCode::ApiServerError,
            Self::Api { .. } => ErrorCode::ApiUnexpectedStatus,
            Self::Transport(e) if e.is_timeout() => ErrorCode::NetTimeout,
            Self::Transport(_) => ErrorCode::NetConnectionFailed,
            Self::MissingField { .. } => ErrorCode::ValMissingField,
            Self::InvalidArguments(_) => ErrorCode::ValInvalidInput,
            Self::Decode(_) => ErrorCode::ParseInvalidJson,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
        }
    }

    /// Whether a caller could reasonably try the same call again later.
    ///
    /// Purely informational; nothing in this workspace retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::ServerError | Self::Transport(_)
        )
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Unauthorized => Some("Check that OMI_API_TOKEN holds a valid token"),
            Self::Forbidden => Some("The token does not grant access to this resource"),
            Self::RateLimited { .. } => Some("Please wait before making more requests"),
            Self::MissingField { .. } => Some("Provide every required tool argument"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(OmiError::from_status(401, None), OmiError::Unauthorized));
        assert!(matches!(OmiError::from_status(403, None), OmiError::Forbidden));
        assert!(matches!(OmiError::from_status(500, None), OmiError::ServerError));
        assert!(matches!(
            OmiError::from_status(502, None),
            OmiError::Api { status: 502 }
        ));
    }

    #[test]
    fn test_rate_limited_message() {
        let err = OmiError::from_status(429, Some(30));
        assert_eq!(err.to_string(), "Rate limited. Retry after 30 seconds");

        let err = OmiError::from_status(429, None);
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn test_unknown_status_message_contains_code() {
        let err = OmiError::from_status(418, None);
        assert_eq!(err.to_string(), "API error: 418");
        assert_eq!(err.status(), Some(418));
        assert_eq!(err.code(), ErrorCode::ApiUnexpectedStatus);
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            OmiError::Unauthorized.to_string(),
            "Unauthorized: Invalid API token"
        );
        assert_eq!(
            OmiError::Forbidden.to_string(),
            "Forbidden: Insufficient permissions"
        );
        assert_eq!(OmiError::ServerError.to_string(), "Internal server error");
    }

    #[test]
    fn test_missing_field() {
        let err = OmiError::missing_field("title");
        assert_eq!(err.code(), ErrorCode::ValMissingField);
        assert_eq!(err.to_string(), "Missing required field: title");
        assert!(err.status().is_none());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::AuthInvalidToken.as_str(), "AUTH_001");
        assert_eq!(ErrorCode::RateLimitExceeded.as_str(), "RATE_001");
    }
}
