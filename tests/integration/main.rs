//! Integration tests using WireMock
//!
//! These tests run the full request/response cycle against a mock HTTP
//! server: URL construction, the API key header, JSON bodies and error
//! mapping.

mod blocking;
mod errors;
mod intents;
mod sessions;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xeroml_client::XeroMlClient;

pub const TEST_API_KEY: &str = "xml_test_abc123";

/// Starts a fresh mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Builds a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> XeroMlClient {
    XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build()
        .expect("Failed to build client")
}

/// A mock that only matches requests carrying the test API key.
pub fn mock_with_auth(method_matcher: &str, path_matcher: &str) -> wiremock::MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("X-API-Key", TEST_API_KEY))
}

/// Helper to create success response templates
pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Helper to create error response templates in the server's shape
pub fn error_response(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"code": code, "message": message, "status": status}
    }))
}

pub fn graph_body() -> Value {
    json!({
        "schema_version": "0.1.0",
        "root_goal": "Plan a trip to Tokyo",
        "sub_goals": [{
            "id": "sg_001",
            "goal": "Book flights",
            "status": "pending",
            "priority": 0.9,
            "children": [{
                "id": "sg_002",
                "goal": "Compare airlines",
                "priority": 0.4
            }]
        }],
        "meta": {
            "confidence": 0.8,
            "latent_states": {
                "goal_intent": "travel_planning",
                "action_readiness": "deciding",
                "ambiguity_level": "partial",
                "risk_sensitivity": "low",
                "intent_scope": "multi_step"
            }
        }
    })
}

pub fn parse_body() -> Value {
    json!({"graph": graph_body(), "request_id": "req_1", "latency_ms": 120})
}
