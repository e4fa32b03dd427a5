//! HTTP transport layer for the XeroML client.
//!
//! The transport performs exactly one HTTP exchange per call. It sits behind
//! the [`HttpTransport`] trait so tests can substitute a recording mock.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::time::Duration;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<TransportError> for crate::errors::XeroMlError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { .. } => crate::errors::XeroMlError::Timeout {
                message: err.to_string(),
            },
            TransportError::Connection { .. } | TransportError::InvalidResponse { .. } => {
                crate::errors::XeroMlError::Network {
                    message: err.to_string(),
                }
            }
        }
    }
}
