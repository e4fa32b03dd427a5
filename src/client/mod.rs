//! XeroML API client.
//!
//! Provides the main client interface for interacting with the XeroML API.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{XeroMlConfig, XeroMlConfigBuilder};
use crate::errors::{XeroMlError, XeroMlResult};
use crate::observability::{DefaultMetricsCollector, MetricsCollector};
use crate::services::{IntentService, RequestExecutor, Session, SessionsService, UsageService};
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::types::graph::{IntentGraph, ParseResponse};
use crate::types::requests::ParseRequest;
use crate::types::session::SessionInfo;
use crate::types::usage::UsageInfo;

/// The main XeroML client.
///
/// Constructing a client performs no I/O. Each method issues exactly one
/// HTTP request.
///
/// # Example
///
/// ```rust,no_run
/// use xeroml_client::XeroMlClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = XeroMlClient::new("xml_your_api_key")?;
///     let graph = client.classify("Help me plan a trip to Tokyo").await?;
///     println!("{}", graph.root_goal);
///     Ok(())
/// }
/// ```
pub struct XeroMlClient {
    config: XeroMlConfig,
    intents: IntentService,
    sessions: SessionsService,
    usage: UsageService,
    metrics: Arc<dyn MetricsCollector>,
}

impl XeroMlClient {
    /// Creates a client from an API key with default settings.
    pub fn new(api_key: impl Into<String>) -> XeroMlResult<Self> {
        XeroMlClientBuilder::new().api_key(api_key).build()
    }

    /// Creates a new client builder.
    pub fn builder() -> XeroMlClientBuilder {
        XeroMlClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `XEROML_API_KEY` and optionally `XEROML_BASE_URL` and
    /// `XEROML_TIMEOUT`.
    pub fn from_env() -> XeroMlResult<Self> {
        let config = XeroMlConfig::from_env()?;
        XeroMlClientBuilder::from_config(config).build()
    }

    /// Classifies a piece of text into an intent graph.
    pub async fn classify(&self, text: &str) -> XeroMlResult<IntentGraph> {
        self.intents.classify(text).await
    }

    /// Parses a message, optionally with a chosen provider.
    ///
    /// Accepts a `&str`, a `String` or a [`ParseRequest`].
    pub async fn parse(&self, request: impl Into<ParseRequest>) -> XeroMlResult<IntentGraph> {
        self.intents.parse(request).await
    }

    /// Parses a message and returns the response envelope.
    pub async fn parse_full(
        &self,
        request: impl Into<ParseRequest>,
    ) -> XeroMlResult<ParseResponse> {
        self.intents.parse_full(request).await
    }

    /// Creates a session, optionally with a caller-chosen id.
    pub async fn create_session(&self, session_id: Option<&str>) -> XeroMlResult<Session> {
        self.sessions.create(session_id).await
    }

    /// Returns a handle to an existing session without contacting the server.
    pub fn session(&self, session_id: impl Into<String>) -> XeroMlResult<Session> {
        self.sessions.get(session_id)
    }

    /// Lists the account's sessions.
    pub async fn list_sessions(&self) -> XeroMlResult<Vec<SessionInfo>> {
        self.sessions.list().await
    }

    /// Fetches credit balance and usage.
    pub async fn get_usage(&self) -> XeroMlResult<UsageInfo> {
        self.usage.get().await
    }

    /// Returns the intent parsing service.
    pub fn intents(&self) -> &IntentService {
        &self.intents
    }

    /// Returns the sessions service.
    pub fn sessions(&self) -> &SessionsService {
        &self.sessions
    }

    /// Returns the usage service.
    pub fn usage(&self) -> &UsageService {
        &self.usage
    }

    /// Returns the configuration.
    pub fn config(&self) -> &XeroMlConfig {
        &self.config
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }
}

impl std::fmt::Debug for XeroMlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XeroMlClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the XeroML client.
pub struct XeroMlClientBuilder {
    config_builder: XeroMlConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
}

impl XeroMlClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: XeroMlConfigBuilder::new(),
            transport: None,
            auth: None,
            metrics: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: XeroMlConfig) -> Self {
        let mut config_builder = XeroMlConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .timeout(config.timeout);
        for (name, value) in config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            ..Self::new()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> XeroMlResult<Self> {
        self.config_builder = self.config_builder.api_key_from_env(var_name)?;
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config_builder = self.config_builder.timeout_secs(secs);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets a custom metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the client.
    pub fn build(self) -> XeroMlResult<XeroMlClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)
                    .map_err(|e| XeroMlError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::new(config.api_key.clone())),
        };
        auth.validate()?;
        let auth_scheme = auth.scheme().to_string();

        let metrics: Arc<dyn MetricsCollector> = self
            .metrics
            .unwrap_or_else(|| Arc::new(DefaultMetricsCollector::new()));

        let executor = Arc::new(RequestExecutor::new(
            transport,
            auth,
            Arc::clone(&metrics),
            config.custom_headers.clone(),
        ));

        tracing::debug!(
            base_url = %config.base_url,
            key_hint = %config.api_key_hint(),
            auth_scheme = %auth_scheme,
            "Built XeroML client"
        );

        Ok(XeroMlClient {
            intents: IntentService::new(Arc::clone(&executor)),
            sessions: SessionsService::new(Arc::clone(&executor)),
            usage: UsageService::new(executor),
            metrics,
            config,
        })
    }

    /// Builds a blocking client that runs requests on its own runtime.
    pub fn build_blocking(self) -> XeroMlResult<crate::blocking::XeroMlClient> {
        crate::blocking::XeroMlClient::from_async(self.build()?)
    }
}

impl Default for XeroMlClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
