//! Integration tests for sessions

use super::*;
use pretty_assertions::assert_eq;
use wiremock::matchers::body_json;
use xeroml_client::{TurnRole, XeroMlError};

#[tokio::test]
async fn test_full_session_flow() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/v1/sessions")
        .and(body_json(json!({})))
        .respond_with(success_response(json!({"session_id": "sess_42"})))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("POST", "/v1/sessions/sess_42/parse")
        .and(body_json(json!({"message": "Plan a trip to Tokyo"})))
        .respond_with(success_response(parse_body()))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("POST", "/v1/sessions/sess_42/update")
        .and(body_json(json!({"response": "Here are some flights", "role": "assistant"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("GET", "/v1/sessions/sess_42/drift")
        .respond_with(success_response(json!({"detected": false})))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("GET", "/v1/sessions/sess_42/graph")
        .respond_with(success_response(graph_body()))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("POST", "/v1/sessions/sess_42/end")
        .and(body_json(json!({})))
        .respond_with(success_response(json!({"status": "completed"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.create_session(None).await.unwrap();
    assert_eq!(session.id(), "sess_42");

    session.parse("Plan a trip to Tokyo").await.unwrap();
    session.update_assistant("Here are some flights").await.unwrap();
    let drift = session.check_drift().await.unwrap();
    assert!(!drift.detected);
    assert!(drift.drift_type.is_none());
    let graph = session.get_graph().await.unwrap();
    assert_eq!(graph.sub_goals[0].id, "sg_001");
    session.end().await.unwrap();

    let metrics = client.metrics().get_metrics();
    assert_eq!(metrics.total_requests, 6);
    assert_eq!(metrics.drift_checks, 1);
    assert_eq!(metrics.drift_detected, 0);
}

#[tokio::test]
async fn test_create_session_with_custom_id() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/v1/sessions")
        .and(body_json(json!({"session_id": "chat-7"})))
        .respond_with(success_response(json!({"session_id": "chat-7"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .create_session(Some("chat-7"))
        .await
        .unwrap();

    assert_eq!(session.id(), "chat-7");
}

#[tokio::test]
async fn test_update_with_user_role() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/v1/sessions/s1/update")
        .and(body_json(json!({"response": "Actually, make it Osaka", "role": "user"})))
        .respond_with(success_response(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .session("s1")
        .unwrap()
        .update("Actually, make it Osaka", TurnRole::User)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_sessions_both_shapes() {
    let server = setup_mock_server().await;
    let entry = json!({
        "session_id": "s1",
        "status": "completed",
        "turn_count": 4,
        "created_at": "2026-03-01T10:00:00Z",
        "updated_at": "2026-03-01T10:05:00Z"
    });

    mock_with_auth("GET", "/v1/sessions")
        .respond_with(success_response(json!({"sessions": [entry.clone()]})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mock_with_auth("GET", "/v1/sessions")
        .respond_with(success_response(json!([entry])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let wrapped = client.list_sessions().await.unwrap();
    let bare = client.list_sessions().await.unwrap();

    assert_eq!(wrapped, bare);
    assert_eq!(wrapped[0].turn_count, 4);
    assert!(!wrapped[0].is_active());
}

#[tokio::test]
async fn test_drift_detected_report() {
    let server = setup_mock_server().await;

    mock_with_auth("GET", "/v1/sessions/s1/drift")
        .respond_with(success_response(json!({
            "detected": true,
            "drift_type": "goal_shift",
            "severity": 0.8,
            "description": "Destination changed",
            "previous_goal": "Trip to Tokyo",
            "current_goal": "Trip to Osaka"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = client.session("s1").unwrap().check_drift().await.unwrap();

    assert!(report.detected);
    assert_eq!(report.current_goal.as_deref(), Some("Trip to Osaka"));
    assert_eq!(client.metrics().get_metrics().drift_detected, 1);
}

#[tokio::test]
async fn test_ended_session_rejects_parse() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/v1/sessions/s1/parse")
        .respond_with(error_response(409, "session_ended", "Session s1 is completed"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .session("s1")
        .unwrap()
        .parse("one more thing")
        .await;

    match result {
        Err(XeroMlError::SessionEnded { message, .. }) => {
            assert_eq!(message, "Session s1 is completed");
        }
        other => panic!("expected SessionEnded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dot_session_ids_rejected_before_io() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(success_response(json!({"detected": true})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for id in [".", ".."] {
        let result = client.session(id);
        assert!(matches!(result, Err(XeroMlError::Validation { .. })), "{id}");
    }
}

#[tokio::test]
async fn test_backslash_session_id_stays_in_its_segment() {
    let server = setup_mock_server().await;

    mock_with_auth("GET", "/v1/sessions/a%5Cb/drift")
        .respond_with(success_response(json!({"detected": false})))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("GET", "/v1/sessions/x%5C..%5C..%5Cusage/drift")
        .respond_with(success_response(json!({"detected": false})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.session("a\\b").unwrap().check_drift().await.unwrap();
    client
        .session("x\\..\\..\\usage")
        .unwrap()
        .check_drift()
        .await
        .unwrap();
}
