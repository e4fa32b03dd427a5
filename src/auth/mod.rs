//! Authentication for the XeroML client.
//!
//! XeroML authenticates with a static API key sent in the `X-API-Key`
//! header on every request.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::key_hint;
use crate::errors::XeroMlError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authentication provider trait.
///
/// Implementations attach credentials to outgoing request headers.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), XeroMlError>;
}

/// API key authentication provider.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            API_KEY_HEADER.to_string(),
            self.api_key.expose_secret().clone(),
        );
    }

    fn scheme(&self) -> &str {
        "ApiKey"
    }

    fn validate(&self) -> Result<(), XeroMlError> {
        let key = self.api_key.expose_secret();

        if key.trim().is_empty() {
            return Err(XeroMlError::configuration("API key cannot be empty"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}
