//! Blocking XeroML client.
//!
//! Wraps the async client and drives each call to completion on a private
//! current-thread Tokio runtime. Do not call these methods from inside an
//! async context; use [`crate::XeroMlClient`] there.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::config::XeroMlConfig;
use crate::errors::{XeroMlError, XeroMlResult};
use crate::observability::MetricsCollector;
use crate::services;
use crate::types::graph::{IntentGraph, ParseResponse};
use crate::types::requests::ParseRequest;
use crate::types::session::{DriftReport, SessionInfo, TurnRole};
use crate::types::usage::UsageInfo;

/// Synchronous XeroML client.
///
/// ```rust,no_run
/// let client = xeroml_client::blocking::XeroMlClient::new("xml_your_api_key")?;
/// let graph = client.classify("Summarise this thread")?;
/// println!("{}", graph.root_goal);
/// # Ok::<(), xeroml_client::XeroMlError>(())
/// ```
pub struct XeroMlClient {
    inner: crate::XeroMlClient,
    runtime: Arc<Runtime>,
}

impl XeroMlClient {
    /// Creates a blocking client from an API key with default settings.
    pub fn new(api_key: impl Into<String>) -> XeroMlResult<Self> {
        crate::XeroMlClient::builder()
            .api_key(api_key)
            .build_blocking()
    }

    /// Creates a blocking client from environment variables.
    pub fn from_env() -> XeroMlResult<Self> {
        let config = XeroMlConfig::from_env()?;
        crate::XeroMlClientBuilder::from_config(config).build_blocking()
    }

    pub(crate) fn from_async(inner: crate::XeroMlClient) -> XeroMlResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| XeroMlError::configuration(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Classifies a piece of text into an intent graph.
    pub fn classify(&self, text: &str) -> XeroMlResult<IntentGraph> {
        self.block_on(self.inner.classify(text))
    }

    /// Parses a message, optionally with a chosen provider.
    pub fn parse(&self, request: impl Into<ParseRequest>) -> XeroMlResult<IntentGraph> {
        self.block_on(self.inner.parse(request))
    }

    /// Parses a message and returns the response envelope.
    pub fn parse_full(&self, request: impl Into<ParseRequest>) -> XeroMlResult<ParseResponse> {
        self.block_on(self.inner.parse_full(request))
    }

    /// Creates a session, optionally with a caller-chosen id.
    pub fn create_session(&self, session_id: Option<&str>) -> XeroMlResult<Session> {
        let inner = self.block_on(self.inner.create_session(session_id))?;
        Ok(self.wrap(inner))
    }

    /// Returns a handle to an existing session without contacting the server.
    pub fn session(&self, session_id: impl Into<String>) -> XeroMlResult<Session> {
        let inner = self.inner.session(session_id)?;
        Ok(self.wrap(inner))
    }

    /// Lists the account's sessions.
    pub fn list_sessions(&self) -> XeroMlResult<Vec<SessionInfo>> {
        self.block_on(self.inner.list_sessions())
    }

    /// Fetches credit balance and usage.
    pub fn get_usage(&self) -> XeroMlResult<UsageInfo> {
        self.block_on(self.inner.get_usage())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &XeroMlConfig {
        self.inner.config()
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        self.inner.metrics()
    }

    fn wrap(&self, inner: services::Session) -> Session {
        Session {
            inner,
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl std::fmt::Debug for XeroMlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::XeroMlClient")
            .field("config", self.inner.config())
            .finish()
    }
}

/// Blocking handle to one server-side session.
#[derive(Clone)]
pub struct Session {
    inner: services::Session,
    runtime: Arc<Runtime>,
}

impl Session {
    /// Returns the session id.
    pub fn id(&self) -> &str {
        self.inner.id()
    }

    /// Parses the next user message in the context of this session.
    pub fn parse(&self, request: impl Into<ParseRequest>) -> XeroMlResult<IntentGraph> {
        self.runtime.block_on(self.inner.parse(request))
    }

    /// Records a turn produced by the application.
    pub fn update(&self, response: &str, role: TurnRole) -> XeroMlResult<()> {
        self.runtime.block_on(self.inner.update(response, role))
    }

    /// Records an assistant reply.
    pub fn update_assistant(&self, response: &str) -> XeroMlResult<()> {
        self.runtime.block_on(self.inner.update_assistant(response))
    }

    /// Asks the server whether the user's goal has drifted.
    pub fn check_drift(&self) -> XeroMlResult<DriftReport> {
        self.runtime.block_on(self.inner.check_drift())
    }

    /// Fetches the session's current intent graph.
    pub fn get_graph(&self) -> XeroMlResult<IntentGraph> {
        self.runtime.block_on(self.inner.get_graph())
    }

    /// Marks the session completed.
    pub fn end(&self) -> XeroMlResult<()> {
        self.runtime.block_on(self.inner.end())
    }

    /// Returns the async handle for the same session.
    pub fn as_async(&self) -> &services::Session {
        &self.inner
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Session")
            .field("session_id", &self.inner.id())
            .finish()
    }
}
