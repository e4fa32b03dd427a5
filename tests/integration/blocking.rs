//! Integration tests for the blocking client

use super::*;
use xeroml_client::blocking;

fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let server = runtime.block_on(setup_mock_server());
    (runtime, server)
}

#[test]
fn test_blocking_classify() {
    let (runtime, server) = start_server();
    runtime.block_on(
        mock_with_auth("POST", "/v1/parse")
            .respond_with(success_response(parse_body()))
            .expect(1)
            .mount(&server),
    );

    let client = XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build_blocking()
        .unwrap();

    let graph = client.classify("Plan a trip to Tokyo").unwrap();
    assert_eq!(graph.root_goal, "Plan a trip to Tokyo");
}

#[test]
fn test_blocking_session_and_usage() {
    let (runtime, server) = start_server();
    runtime.block_on(async {
        mock_with_auth("POST", "/v1/sessions")
            .respond_with(success_response(json!({"session_id": "sess_b"})))
            .mount(&server)
            .await;
        mock_with_auth("GET", "/v1/sessions/sess_b/drift")
            .respond_with(success_response(json!({"detected": false})))
            .mount(&server)
            .await;
        mock_with_auth("GET", "/v1/usage")
            .respond_with(error_response(401, "invalid_api_key", "Revoked"))
            .mount(&server)
            .await;
    });

    let client: blocking::XeroMlClient = XeroMlClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build_blocking()
        .unwrap();

    let session = client.create_session(None).unwrap();
    assert!(!session.check_drift().unwrap().detected);
    assert!(matches!(
        client.get_usage(),
        Err(xeroml_client::XeroMlError::InvalidApiKey { .. })
    ));
}
