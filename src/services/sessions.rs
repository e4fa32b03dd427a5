//! Multi-turn session service.
//!
//! A session tracks one conversation on the server so the intent graph can
//! evolve across turns and drift can be detected.

use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use crate::errors::{XeroMlError, XeroMlResult};
use crate::services::executor::RequestExecutor;
use crate::services::intents::{fetch_graph, request_graph};
use crate::types::graph::IntentGraph;
use crate::types::requests::{validate_session_id, CreateSessionRequest, ParseRequest, UpdateRequest};
use crate::types::session::{DriftReport, SessionCreated, SessionInfo, SessionListPayload, TurnRole};

const SESSIONS_PATH: &str = "/v1/sessions";

/// Service for creating and listing sessions.
pub struct SessionsService {
    executor: Arc<RequestExecutor>,
}

impl SessionsService {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Creates a session, optionally with a caller-chosen id.
    ///
    /// The returned handle uses the id the server reports.
    #[instrument(skip(self))]
    pub async fn create(&self, session_id: Option<&str>) -> XeroMlResult<Session> {
        if let Some(id) = session_id {
            validate_session_id(id)?;
        }

        let body = CreateSessionRequest {
            session_id: session_id.map(str::to_string),
        };
        let created: SessionCreated = self
            .executor
            .post_json("create_session", SESSIONS_PATH, &body)
            .await?;

        validate_session_id(&created.session_id).map_err(|_| XeroMlError::Serialization {
            message: format!("Server returned unusable session id '{}'", created.session_id),
        })?;
        tracing::info!(session_id = %created.session_id, "Created session");

        Ok(Session::new(Arc::clone(&self.executor), created.session_id))
    }

    /// Returns a handle to an existing session without contacting the server.
    pub fn get(&self, session_id: impl Into<String>) -> XeroMlResult<Session> {
        let session_id = session_id.into();
        validate_session_id(&session_id)?;
        Ok(Session::new(Arc::clone(&self.executor), session_id))
    }

    /// Lists the account's sessions.
    #[instrument(skip(self))]
    pub async fn list(&self) -> XeroMlResult<Vec<SessionInfo>> {
        let payload: SessionListPayload = self
            .executor
            .get_json("list_sessions", SESSIONS_PATH)
            .await?;
        Ok(payload.into_sessions())
    }
}

impl std::fmt::Debug for SessionsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionsService").finish()
    }
}

/// Handle to one server-side session.
///
/// Cheap to clone; all clones address the same session.
#[derive(Clone)]
pub struct Session {
    executor: Arc<RequestExecutor>,
    session_id: String,
}

impl Session {
    pub(crate) fn new(executor: Arc<RequestExecutor>, session_id: String) -> Self {
        Self {
            executor,
            session_id,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> &str {
        &self.session_id
    }

    fn path(&self, action: &str) -> String {
        format!(
            "{}/{}/{}",
            SESSIONS_PATH,
            urlencoding::encode(&self.session_id),
            action
        )
    }

    /// Parses the next user message in the context of this session.
    #[instrument(skip(self, request), fields(session_id = %self.session_id))]
    pub async fn parse(&self, request: impl Into<ParseRequest>) -> XeroMlResult<IntentGraph> {
        let request = request.into();
        request_graph(&self.executor, "session_parse", &self.path("parse"), &request)
            .await
            .map(|response| response.graph)
    }

    /// Records a turn produced by the application, usually the assistant's reply.
    #[instrument(skip(self, response), fields(session_id = %self.session_id))]
    pub async fn update(&self, response: &str, role: TurnRole) -> XeroMlResult<()> {
        if response.is_empty() {
            return Err(XeroMlError::validation_param(
                "Response cannot be empty",
                "response",
            ));
        }
        let body = UpdateRequest { response, role };
        self.executor
            .post_unit("session_update", &self.path("update"), &body)
            .await
    }

    /// Records an assistant reply.
    pub async fn update_assistant(&self, response: &str) -> XeroMlResult<()> {
        self.update(response, TurnRole::Assistant).await
    }

    /// Asks the server whether the user's goal has drifted.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn check_drift(&self) -> XeroMlResult<DriftReport> {
        let report: DriftReport = self
            .executor
            .get_json("check_drift", &self.path("drift"))
            .await?;
        self.executor.metrics().record_drift(report.detected);
        if report.detected {
            tracing::info!(
                drift_type = report.drift_type.as_deref().unwrap_or("unknown"),
                severity = report.severity.unwrap_or_default(),
                "Intent drift detected"
            );
        }
        Ok(report)
    }

    /// Fetches the session's current intent graph.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn get_graph(&self) -> XeroMlResult<IntentGraph> {
        fetch_graph(&self.executor, "get_graph", &self.path("graph")).await
    }

    /// Marks the session completed. Later calls fail with `SessionEnded`.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn end(&self) -> XeroMlResult<()> {
        self.executor
            .post_unit("end_session", &self.path("end"), &json!({}))
            .await?;
        tracing::info!(session_id = %self.session_id, "Ended session");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .finish()
    }
}
