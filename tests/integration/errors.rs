//! Integration tests for error mapping

use super::*;
use std::time::Duration;
use test_case::test_case;
use xeroml_client::XeroMlError;

fn variant_name(error: &XeroMlError) -> &'static str {
    match error {
        XeroMlError::InvalidApiKey { .. } => "InvalidApiKey",
        XeroMlError::CreditsExhausted { .. } => "CreditsExhausted",
        XeroMlError::SessionNotFound { .. } => "SessionNotFound",
        XeroMlError::SessionEnded { .. } => "SessionEnded",
        XeroMlError::ParseFailed { .. } => "ParseFailed",
        XeroMlError::RateLimited { .. } => "RateLimited",
        XeroMlError::Api { .. } => "Api",
        XeroMlError::Network { .. } => "Network",
        XeroMlError::Timeout { .. } => "Timeout",
        _ => "Other",
    }
}

#[test_case(401, "invalid_api_key", "InvalidApiKey" ; "unauthorized")]
#[test_case(402, "credits_exhausted", "CreditsExhausted" ; "payment required")]
#[test_case(404, "session_not_found", "SessionNotFound" ; "not found")]
#[test_case(409, "session_ended", "SessionEnded" ; "conflict")]
#[test_case(422, "parse_failed", "ParseFailed" ; "unprocessable")]
#[test_case(429, "rate_limited", "RateLimited" ; "too many requests")]
#[test_case(500, "internal_error", "Api" ; "server error")]
#[test_case(503, "unavailable", "Api" ; "service unavailable")]
#[tokio::test]
async fn test_status_maps_to_error(status: u16, code: &str, expected: &str) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/v1/parse"))
        .respond_with(error_response(status, code, "boom"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server).classify("hello").await.unwrap_err();

    assert_eq!(variant_name(&error), expected);
    assert_eq!(error.status(), Some(status));
    assert_eq!(error.code(), code);
    assert!(error.to_string().contains("boom"));
}

#[tokio::test]
async fn test_credits_exhausted_details() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/usage"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "code": "credits_exhausted",
                "message": "All 100 credits used.",
                "details": {"credits_used": 100, "credits_total": 100}
            }
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).get_usage().await.unwrap_err();

    let details = error.details().unwrap();
    assert_eq!(details["credits_used"], json!(100));
    assert_eq!(details["credits_total"], json!(100));
}

#[tokio::test]
async fn test_rate_limit_retry_after() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/sessions"))
        .respond_with(error_response(429, "rate_limited", "Slow down").insert_header("Retry-After", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server).list_sessions().await.unwrap_err();

    assert_eq!(error.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/usage"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let error = client_for(&server).get_usage().await.unwrap_err();

    match error {
        XeroMlError::Api { code, status, message, .. } => {
            assert_eq!(code, "unknown");
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_retry_on_server_error() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/usage"))
        .respond_with(error_response(503, "unavailable", "Try later"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_usage().await.is_err());
    assert_eq!(client.metrics().get_metrics().failed_requests, 1);
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/usage"))
        .respond_with(success_response(json!({})).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let error = client.get_usage().await.unwrap_err();
    assert!(matches!(error, XeroMlError::Timeout { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let error = client.get_usage().await.unwrap_err();
    assert!(matches!(error, XeroMlError::Network { .. }));
}
