//! Error types for the XeroML client.
//!
//! API failures are decoded from the response body and mapped by HTTP status
//! onto typed variants. Transport, configuration and validation failures have
//! their own variants. Nothing in this crate retries; every error reaches the
//! caller as-is.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Result type alias for XeroML operations.
pub type XeroMlResult<T> = Result<T, XeroMlError>;

/// Structured details attached to an API error (e.g. credit counters).
pub type ErrorDetails = serde_json::Map<String, Value>;

/// Error type for XeroML client operations.
#[derive(Debug, Error)]
pub enum XeroMlError {
    /// Configuration error (missing API key, bad base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Request rejected locally before any I/O.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue.
        message: String,
        /// The parameter that caused the error.
        param: Option<String>,
    },

    /// The API key is invalid or revoked (HTTP 401).
    #[error("Invalid API key: {message}")]
    InvalidApiKey {
        /// Error message from the API.
        message: String,
        /// Additional details from the API.
        details: Option<ErrorDetails>,
    },

    /// The account has no credits left (HTTP 402).
    #[error("Credits exhausted: {message}")]
    CreditsExhausted {
        /// Error message from the API.
        message: String,
        /// Additional details, typically `credits_used` and `credits_total`.
        details: Option<ErrorDetails>,
    },

    /// The session does not exist (HTTP 404).
    #[error("Session not found: {message}")]
    SessionNotFound {
        /// Error message from the API.
        message: String,
        /// Additional details from the API.
        details: Option<ErrorDetails>,
    },

    /// The session has already been completed (HTTP 409).
    #[error("Session ended: {message}")]
    SessionEnded {
        /// Error message from the API.
        message: String,
        /// Additional details from the API.
        details: Option<ErrorDetails>,
    },

    /// The server could not parse the message into an intent graph (HTTP 422).
    #[error("Parse failed: {message}")]
    ParseFailed {
        /// Error message from the API.
        message: String,
        /// Additional details from the API.
        details: Option<ErrorDetails>,
    },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from the API.
        message: String,
        /// Additional details from the API.
        details: Option<ErrorDetails>,
        /// Value of the `Retry-After` header, if the server sent one.
        retry_after: Option<Duration>,
    },

    /// Any other non-success response.
    #[error("API error (HTTP {status}, {code}): {message}")]
    Api {
        /// Error code reported by the API.
        code: String,
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
        /// Additional details from the API.
        details: Option<ErrorDetails>,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl XeroMlError {
    /// Returns the machine-readable error code.
    ///
    /// API errors use the code the server reports; local failures use a fixed
    /// code per variant.
    pub fn code(&self) -> &str {
        match self {
            XeroMlError::Configuration { .. } => "configuration_error",
            XeroMlError::Validation { .. } => "validation_error",
            XeroMlError::InvalidApiKey { .. } => "invalid_api_key",
            XeroMlError::CreditsExhausted { .. } => "credits_exhausted",
            XeroMlError::SessionNotFound { .. } => "session_not_found",
            XeroMlError::SessionEnded { .. } => "session_ended",
            XeroMlError::ParseFailed { .. } => "parse_failed",
            XeroMlError::RateLimited { .. } => "rate_limited",
            XeroMlError::Api { code, .. } => code,
            XeroMlError::Network { .. } => "network_error",
            XeroMlError::Timeout { .. } => "timeout",
            XeroMlError::Serialization { .. } => "serialization_error",
        }
    }

    /// Returns the HTTP status for errors produced by an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            XeroMlError::InvalidApiKey { .. } => Some(401),
            XeroMlError::CreditsExhausted { .. } => Some(402),
            XeroMlError::SessionNotFound { .. } => Some(404),
            XeroMlError::SessionEnded { .. } => Some(409),
            XeroMlError::ParseFailed { .. } => Some(422),
            XeroMlError::RateLimited { .. } => Some(429),
            XeroMlError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the error details sent by the API, if any.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            XeroMlError::InvalidApiKey { details, .. }
            | XeroMlError::CreditsExhausted { details, .. }
            | XeroMlError::SessionNotFound { details, .. }
            | XeroMlError::SessionEnded { details, .. }
            | XeroMlError::ParseFailed { details, .. }
            | XeroMlError::RateLimited { details, .. }
            | XeroMlError::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Returns the retry-after duration if the server sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            XeroMlError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns true for 4xx API errors.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns true for 5xx API errors.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        XeroMlError::Validation {
            message: message.into(),
            param: None,
        }
    }

    /// Creates a validation error with parameter.
    pub fn validation_param(message: impl Into<String>, param: impl Into<String>) -> Self {
        XeroMlError::Validation {
            message: message.into(),
            param: Some(param.into()),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        XeroMlError::Configuration {
            message: message.into(),
        }
    }

    /// Builds the typed error for a non-success API response.
    ///
    /// The body is read as `{"error": {...}}` or as the error object itself.
    /// Bodies that are not JSON objects keep their raw text as the message.
    pub fn from_response(status: u16, headers: &HashMap<String, String>, body: &[u8]) -> Self {
        let detail = ApiErrorDetail::from_body(body);
        let ApiErrorDetail {
            code,
            message,
            details,
        } = detail;

        match status {
            401 => XeroMlError::InvalidApiKey { message, details },
            402 => XeroMlError::CreditsExhausted { message, details },
            404 => XeroMlError::SessionNotFound { message, details },
            409 => XeroMlError::SessionEnded { message, details },
            422 => XeroMlError::ParseFailed { message, details },
            429 => XeroMlError::RateLimited {
                message,
                details,
                retry_after: parse_retry_after(headers),
            },
            _ => XeroMlError::Api {
                code: code.unwrap_or_else(|| "unknown".to_string()),
                status,
                message,
                details,
            },
        }
    }
}

/// Decoded error payload of an API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    /// The error code, if reported.
    pub code: Option<String>,
    /// The error message.
    pub message: String,
    /// Structured details.
    pub details: Option<ErrorDetails>,
}

impl ApiErrorDetail {
    const UNKNOWN_MESSAGE: &'static str = "Unknown error";

    /// Decodes an error payload from a raw response body.
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(Value::Object(root)) = serde_json::from_slice::<Value>(body) else {
            let text = String::from_utf8_lossy(body).trim().to_string();
            return Self {
                code: None,
                message: if text.is_empty() {
                    Self::UNKNOWN_MESSAGE.to_string()
                } else {
                    text
                },
                details: None,
            };
        };

        let error = match root.get("error") {
            Some(Value::Object(inner)) => inner,
            _ => &root,
        };

        Self {
            code: error.get("code").and_then(Value::as_str).map(str::to_string),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(Self::UNKNOWN_MESSAGE)
                .to_string(),
            details: match error.get("details") {
                Some(Value::Object(details)) => Some(details.clone()),
                _ => None,
            },
        }
    }
}

fn parse_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("retry-after"))
        .and_then(|(_, value)| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

impl From<reqwest::Error> for XeroMlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            XeroMlError::Timeout {
                message: err.to_string(),
            }
        } else {
            XeroMlError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for XeroMlError {
    fn from(err: serde_json::Error) -> Self {
        XeroMlError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for XeroMlError {
    fn from(err: url::ParseError) -> Self {
        XeroMlError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
