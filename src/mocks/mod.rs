//! Mock implementations for testing.
//!
//! Provides a recording mock transport and sample API payloads for unit
//! testing without making real API calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates an API error response in the server's `{"error": {...}}` shape.
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        let error = serde_json::json!({
            "error": {
                "code": code,
                "message": message,
                "status": status
            }
        });

        Self::json(&error).with_status(status)
    }

    /// Creates a plain-text response.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates a response with no body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
}

enum Scripted {
    Response(MockResponse),
    Failure(String),
}

/// Mock HTTP transport that replays queued responses in order.
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.script).push_back(Scripted::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an API error response.
    pub fn queue_error(&self, status: u16, code: &str, message: &str) {
        self.queue(MockResponse::error(status, code, message));
    }

    /// Queues a connection failure.
    pub fn queue_failure(&self, message: &str) {
        lock(&self.script).push_back(Scripted::Failure(message.to_string()));
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path,
            body: request.body,
            headers: request.headers,
        });

        let next = lock(&self.script).pop_front();
        match next {
            Some(Scripted::Response(response)) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            Some(Scripted::Failure(message)) => Err(TransportError::Connection { message }),
            None => Err(TransportError::InvalidResponse {
                message: "No mock response configured".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Sample API payloads.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A one-goal intent graph.
    pub fn sample_graph() -> Value {
        json!({
            "schema_version": "0.1.0",
            "root_goal": "Refactor auth module",
            "sub_goals": [{
                "id": "sg_001",
                "goal": "Add OAuth2 support",
                "status": "pending",
                "priority": 0.9,
                "success_criteria": ["OAuth2 flow works"],
                "constraints": [],
                "uncertainty": 0.3,
                "context_requirements": [],
                "modality": "code",
                "dependencies": [],
                "children": []
            }],
            "meta": {
                "source": "user_input",
                "confidence": 0.85,
                "negotiation_history": [],
                "latent_states": {
                    "goal_intent": "refactoring",
                    "action_readiness": "executing",
                    "ambiguity_level": "clear",
                    "risk_sensitivity": "medium",
                    "intent_scope": "compound"
                }
            }
        })
    }

    /// The `/v1/parse` envelope around [`sample_graph`].
    pub fn sample_parse_response() -> Value {
        json!({
            "graph": sample_graph(),
            "request_id": "req_abc123",
            "latency_ms": 150
        })
    }

    /// Response to session creation.
    pub fn sample_session_created() -> Value {
        json!({"session_id": "sess_test123"})
    }

    /// A one-entry session list.
    pub fn sample_session_list() -> Value {
        json!({
            "sessions": [{
                "session_id": "s1",
                "status": "active",
                "turn_count": 2,
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-01-01T00:01:00Z"
            }]
        })
    }

    /// Usage with one month of activity.
    pub fn sample_usage() -> Value {
        json!({
            "credits": {"used": 42, "total": 100, "remaining": 58},
            "tier": "free",
            "rate_limit": 100,
            "usage": [{
                "month": "2026-02-01",
                "parse_calls": 42,
                "drift_checks": 0,
                "session_creates": 5,
                "total_latency_ms": 1200
            }]
        })
    }

    /// A positive drift report.
    pub fn sample_drift() -> Value {
        json!({
            "detected": true,
            "drift_type": "scope_creep",
            "severity": 0.6,
            "description": "User added new requirement",
            "previous_goal": "Refactor auth",
            "current_goal": "Refactor auth + add payments"
        })
    }
}
