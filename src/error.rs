//! Error types for the Granola client
//!
//! Every call made through the client either returns a validated value or
//! exactly one [`Error`] from a closed taxonomy: `Auth`, `RateLimited`,
//! `Timeout`, `Validation` and `Api`. `Config` is only produced while building
//! a client, and `Lookup` only by the folder helpers.

use crate::decode::FieldError;
use std::time::Duration;
use thiserror::Error;

/// The main error type for the Granola client
#[derive(Error, Debug, Clone)]
pub enum Error {
    // ============================================================================
    // Call Errors
    // ============================================================================
    /// Missing, invalid or expired credential, or a failed refresh
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        /// HTTP status when the server rejected the credential (401/403)
        status: Option<u16>,
    },

    /// HTTP 429
    #[error("Rate limited (HTTP {status}): {body}")]
    RateLimited {
        status: u16,
        retry_after: Option<Duration>,
        body: String,
    },

    /// Attempt timeout, caller deadline, or connection-level failure
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Response body did not match the expected shape or record
    #[error("Response validation failed: {message}")]
    Validation {
        message: String,
        field_errors: Vec<FieldError>,
        response_text: String,
    },

    /// Any other non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    // ============================================================================
    // Client-side Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Lookup failed: {message}")]
    Lookup { message: String },
}

/// Discriminant of [`Error`], handy for matching and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Timeout,
    Validation,
    Api,
    Config,
    Lookup,
}

impl Error {
    /// Create an auth error not tied to an HTTP status
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            status: None,
        }
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a generic API error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a lookup error
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    /// The taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth { .. } => ErrorKind::Auth,
            Error::RateLimited { .. } => ErrorKind::RateLimit,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Api { .. } => ErrorKind::Api,
            Error::Config { .. } => ErrorKind::Config,
            Error::Lookup { .. } => ErrorKind::Lookup,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } => *status,
            Error::RateLimited { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided retry hint (429 only)
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// True for a 401, the only status that triggers a credential refresh
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Auth { status: Some(401), .. })
    }

    /// Check if this error is retryable
    ///
    /// Timeouts, connection failures, 429 and 5xx are transient. Auth,
    /// validation and other 4xx can never be fixed by sending the same
    /// request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::RateLimited { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Error::Auth { message, .. }
            | Error::Timeout { message }
            | Error::Validation { message, .. }
            | Error::Config { message }
            | Error::Lookup { message } => message.clone(),
            Error::RateLimited { body, .. } | Error::Api { body, .. } => body.clone(),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Map a non-success HTTP status onto the taxonomy
pub fn classify_status(status: u16, body: String, retry_after: Option<Duration>) -> Error {
    match status {
        401 | 403 => Error::Auth {
            message: if body.is_empty() {
                format!("server rejected credential with HTTP {status}")
            } else {
                format!("HTTP {status}: {body}")
            },
            status: Some(status),
        },
        429 => Error::RateLimited {
            status,
            retry_after,
            body,
        },
        _ => Error::Api { status, body },
    }
}

/// Map a transport failure onto the taxonomy
///
/// Socket, connect and timeout failures all surface as `Timeout`; a request
/// that could not even be built is a configuration problem.
pub fn classify_transport(err: &reqwest::Error) -> Error {
    if err.is_builder() {
        return Error::config(format!("invalid request: {err}"));
    }
    let message = if err.is_timeout() {
        format!("attempt exceeded its timeout: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("transport failure: {err}")
    };
    Error::Timeout { message }
}

// ============================================================================
// Construction-time conversions
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::config(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::config(format!("Failed to parse JSON: {err}"))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::config(format!("Failed to parse YAML: {err}"))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::config(format!("Invalid URL: {err}"))
    }
}

/// Result type alias for the Granola client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::config(format!("{}: {}", message.into(), inner.message()))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::config(format!("{}: {}", f(), inner.message()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::api(404, "Not found");
        assert_eq!(err.to_string(), "API error (HTTP 404): Not found");

        let err = Error::timeout("deadline exceeded");
        assert_eq!(err.to_string(), "Request timed out: deadline exceeded");
    }

    #[test_case(401, ErrorKind::Auth ; "unauthorized")]
    #[test_case(403, ErrorKind::Auth ; "forbidden")]
    #[test_case(429, ErrorKind::RateLimit ; "too many requests")]
    #[test_case(400, ErrorKind::Api ; "bad request")]
    #[test_case(404, ErrorKind::Api ; "not found")]
    #[test_case(500, ErrorKind::Api ; "server error")]
    #[test_case(503, ErrorKind::Api ; "unavailable")]
    fn test_classify_status(status: u16, kind: ErrorKind) {
        let err = classify_status(status, "body".to_string(), None);
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status(), Some(status));
    }

    #[test]
    fn test_classify_rate_limit_keeps_hint() {
        let err = classify_status(429, String::new(), Some(Duration::from_secs(2)));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::timeout("slow").is_retryable());
        assert!(Error::api(500, "").is_retryable());
        assert!(Error::api(503, "").is_retryable());
        assert!(classify_status(429, String::new(), None).is_retryable());

        assert!(!Error::api(400, "").is_retryable());
        assert!(!Error::api(404, "").is_retryable());
        assert!(!classify_status(401, String::new(), None).is_retryable());
        assert!(!classify_status(403, String::new(), None).is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::Validation {
            message: "missing field".to_string(),
            field_errors: vec![],
            response_text: "{}".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_only_401_is_unauthorized() {
        assert!(classify_status(401, String::new(), None).is_unauthorized());
        assert!(!classify_status(403, String::new(), None).is_unauthorized());
        assert!(!Error::auth("no token").is_unauthorized());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: inner"));
    }
}
