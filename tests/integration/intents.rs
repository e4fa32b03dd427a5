//! Integration tests for intent parsing

use super::*;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path};
use xeroml_client::{IntentScope, ParseRequest, XeroMlError};

#[tokio::test]
async fn test_classify_posts_message() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/v1/parse")
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"message": "Plan a trip to Tokyo"})))
        .respond_with(success_response(parse_body()))
        .expect(1)
        .mount(&server)
        .await;

    let graph = client_for(&server)
        .classify("Plan a trip to Tokyo")
        .await
        .unwrap();

    assert_eq!(graph.root_goal, "Plan a trip to Tokyo");
    assert_eq!(graph.sub_goal_count(), 2);
    assert_eq!(graph.meta.latent_states.intent_scope, IntentScope::MultiStep);
    assert_eq!(graph.find("sg_002").map(|g| g.modality.as_str()), Some("text"));
}

#[tokio::test]
async fn test_parse_with_provider() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/v1/parse")
        .and(body_json(json!({"message": "Hi", "provider": "anthropic"})))
        .respond_with(success_response(parse_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .parse_full(ParseRequest::new("Hi").provider("anthropic"))
        .await
        .unwrap();

    assert_eq!(response.request_id.as_deref(), Some("req_1"));
    assert_eq!(response.latency_ms, Some(120));
}

#[tokio::test]
async fn test_bare_graph_response_accepted() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/v1/parse"))
        .respond_with(success_response(graph_body()))
        .mount(&server)
        .await;

    let response = client_for(&server).parse_full("Plan a trip").await.unwrap();

    assert_eq!(response.graph.root_goal, "Plan a trip to Tokyo");
    assert!(response.request_id.is_none());
}

#[tokio::test]
async fn test_empty_message_never_sent() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(success_response(parse_body()))
        .expect(0)
        .mount(&server)
        .await;

    let result = client_for(&server).classify("   ").await;

    assert!(matches!(result, Err(XeroMlError::Validation { .. })));
}

#[tokio::test]
async fn test_out_of_range_confidence_rejected() {
    let server = setup_mock_server().await;
    let mut body = graph_body();
    body["meta"]["confidence"] = json!(1.5);

    Mock::given(method("POST"))
        .and(path("/v1/parse"))
        .respond_with(success_response(json!({"graph": body})))
        .mount(&server)
        .await;

    let result = client_for(&server).classify("anything").await;

    assert!(matches!(result, Err(XeroMlError::Validation { .. })));
}

#[tokio::test]
async fn test_base_url_path_prefix_preserved() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/proxy/v1/parse"))
        .respond_with(success_response(parse_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(format!("{}/proxy/", server.uri()))
        .build()
        .unwrap();

    client.classify("Plan a trip").await.unwrap();
}

#[tokio::test]
async fn test_custom_headers_sent() {
    let server = setup_mock_server().await;

    mock_with_auth("GET", "/v1/usage")
        .and(header("x-tenant", "acme"))
        .respond_with(success_response(json!({
            "credits": {"used": 1, "total": 10, "remaining": 9},
            "tier": "free",
            "rate_limit": 60,
            "usage": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .header("X-Tenant", "acme")
        .header("X-API-Key", "xml_spoofed")
        .build()
        .unwrap();

    let usage = client.get_usage().await.unwrap();
    assert_eq!(usage.credits.remaining, 9);
}
