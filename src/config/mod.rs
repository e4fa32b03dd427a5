//! Configuration module for the XeroML client.
//!
//! Holds the API key, base URL, timeout and any extra headers sent with
//! every request.

use reqwest::header::{HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use crate::errors::{XeroMlError, XeroMlResult};

/// Default base URL for the XeroML API.
pub const DEFAULT_BASE_URL: &str = "https://api.xeroml.com";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "XEROML_API_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "XEROML_BASE_URL";

/// Environment variable overriding the timeout, in seconds.
pub const ENV_TIMEOUT: &str = "XEROML_TIMEOUT";

/// Prefix carried by keys issued by XeroML.
pub const API_KEY_PREFIX: &str = "xml_";

/// Configuration for the XeroML client.
#[derive(Clone)]
pub struct XeroMlConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl XeroMlConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> XeroMlConfigBuilder {
        XeroMlConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `XEROML_API_KEY` (required): API key for authentication
    /// - `XEROML_BASE_URL` (optional): Custom base URL
    /// - `XEROML_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> XeroMlResult<Self> {
        let mut builder = XeroMlConfigBuilder::new().api_key_from_env(ENV_API_KEY)?;

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var(ENV_TIMEOUT) {
            match timeout_str.trim().parse::<u64>() {
                Ok(secs) => builder = builder.timeout_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %timeout_str, "Ignoring unparsable {}", ENV_TIMEOUT);
                }
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for XeroMlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XeroMlConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("custom_headers", &self.custom_headers.len())
            .finish()
    }
}

/// Last four characters of a key, or `****` for short keys.
pub(crate) fn key_hint(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 4 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}

/// Builder for `XeroMlConfig`.
#[derive(Default)]
pub struct XeroMlConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl XeroMlConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> XeroMlResult<Self> {
        let api_key = std::env::var(var_name).map_err(|_| {
            XeroMlError::configuration(format!("Environment variable {} not set", var_name))
        })?;
        self.api_key = Some(api_key);
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> XeroMlResult<XeroMlConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| XeroMlError::configuration("API key is required"))?;

        if api_key.trim().is_empty() {
            return Err(XeroMlError::configuration("API key cannot be empty"));
        }

        if !api_key.starts_with(API_KEY_PREFIX) {
            tracing::warn!(
                key_hint = %key_hint(&api_key),
                "API key does not match expected XeroML format (xml_*)"
            );
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url)?;
        match parsed.scheme() {
            "https" => {}
            "http" => tracing::debug!(base_url = %base_url, "Using plain HTTP base URL"),
            other => {
                return Err(XeroMlError::configuration(format!(
                    "Base URL must use http or https, got '{}'",
                    other
                )))
            }
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(XeroMlError::configuration("Timeout must be greater than zero"));
        }

        for (name, value) in &self.custom_headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                XeroMlError::configuration(format!("Invalid header name '{}'", name))
            })?;
            HeaderValue::from_str(value).map_err(|_| {
                XeroMlError::configuration(format!("Invalid value for header '{}'", name))
            })?;
        }

        Ok(XeroMlConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout,
            custom_headers: self.custom_headers,
        })
    }
}

/// Serialises tests that mutate the process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn with_env<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(name, _)| (name.to_string(), std::env::var(name).ok()))
        .collect();
    for (name, value) in vars {
        match value {
            Some(value) => std::env::set_var(name, value),
            None => std::env::remove_var(name),
        }
    }
    let result = f();
    for (name, value) in saved {
        match value {
            Some(value) => std::env::set_var(&name, value),
            None => std::env::remove_var(&name),
        }
    }
    result
}
