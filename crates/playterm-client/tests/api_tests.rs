mod common;

use common::PlaygroundMock;
use playterm_client::{
    ApiClient, ClientConfig, InstanceError, SessionError, SessionId, VerificationToken,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_create_session_returns_trimmed_id() {
    let mock = PlaygroundMock::start().await;
    mock.mock_session("tok-1", 200, "abc123\n").await;

    let api = ApiClient::new(mock.config());
    let id = api
        .create_session(&VerificationToken::new("tok-1"))
        .await
        .unwrap();
    assert_eq!(id, SessionId::new("abc123"));
}

#[tokio::test]
async fn test_create_session_rejected() {
    let mock = PlaygroundMock::start().await;
    mock.mock_session("bad", 403, "").await;

    let api = ApiClient::new(mock.config());
    let err = api
        .create_session(&VerificationToken::new("bad"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Rejected { status: 403 }));
}

#[tokio::test]
async fn test_create_session_empty_body() {
    let mock = PlaygroundMock::start().await;
    mock.mock_session("tok", 200, "  ").await;

    let api = ApiClient::new(mock.config());
    let err = api
        .create_session(&VerificationToken::new("tok"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::EmptySessionId));
}

#[tokio::test]
async fn test_create_instance_parses_descriptor() {
    let mock = PlaygroundMock::start().await;
    mock.mock_instance(
        "abc",
        json!({"name": "node1", "hostname": "node1", "ip": "10.0.0.5", "proxy_host": "x"}),
    )
    .await;

    let api = ApiClient::new(mock.config());
    let descriptor = api.create_instance(&SessionId::new("abc")).await.unwrap();
    assert_eq!(descriptor.name, "node1");
    assert_eq!(descriptor.hostname.as_deref(), Some("node1"));
    assert_eq!(descriptor.extra.get("proxy_host"), Some(&json!("x")));
}

#[tokio::test]
async fn test_create_instance_conflict_is_capacity() {
    let mock = PlaygroundMock::start().await;
    mock.mock_instance_status("abc", 409).await;

    let api = ApiClient::new(mock.config());
    let err = api.create_instance(&SessionId::new("abc")).await.unwrap_err();
    assert!(err.is_capacity_exceeded());
}

#[tokio::test]
async fn test_create_instance_other_status_is_generic() {
    let mock = PlaygroundMock::start().await;
    mock.mock_instance_status("abc", 500).await;

    let api = ApiClient::new(mock.config());
    let err = api.create_instance(&SessionId::new("abc")).await.unwrap_err();
    assert!(matches!(err, InstanceError::Generic { status: 500 }));
}

#[tokio::test]
async fn test_create_instance_other_success_status_is_generic() {
    let mock = PlaygroundMock::start().await;
    mock.mock_instance_with_status("abc", 201, json!({"name": "node1"}))
        .await;

    let api = ApiClient::new(mock.config());
    let err = api.create_instance(&SessionId::new("abc")).await.unwrap_err();
    assert!(matches!(err, InstanceError::Generic { status: 201 }));
}

#[tokio::test]
async fn test_create_instance_malformed_body() {
    let mock = PlaygroundMock::start().await;
    mock.mock_instance_body("abc", "not json").await;

    let api = ApiClient::new(mock.config());
    let err = api.create_instance(&SessionId::new("abc")).await.unwrap_err();
    assert!(matches!(err, InstanceError::InvalidDescriptor(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let api = ApiClient::new(ClientConfig::new("http://127.0.0.1:1"));
    let err = api.create_instance(&SessionId::new("abc")).await.unwrap_err();
    assert!(matches!(err, InstanceError::Transport(_)));
}
