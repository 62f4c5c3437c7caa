//! Session provider integration tests

mod common;

use common::*;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use study_assistant::{AuthProvider, ClientError, MemoryStore, SelectionPolicy, SessionProvider};
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_sessions(server: &MockServer, sessions: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sessions))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_connect_requires_login() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let auth = AuthProvider::restore(api(&server), Arc::new(MemoryStore::new()));
    let result = SessionProvider::connect(&auth, SelectionPolicy::Keep).await;

    assert!(matches!(result, Err(ClientError::NotAuthenticated)));
}

#[tokio::test]
async fn test_first_session_selected_when_nothing_selected() {
    let server = MockServer::start().await;
    mount_sessions(
        &server,
        json!([session_json("s1", "Biology"), session_json("s2", "Chemistry")]),
    )
    .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();

    assert_eq!(sessions.sessions().len(), 2);
    assert_eq!(sessions.current_session_id().as_deref(), Some("s1"));
    assert_eq!(sessions.current_session().unwrap().title, "Biology");
}

#[tokio::test]
async fn test_refresh_keeps_existing_selection() {
    let server = MockServer::start().await;
    mount_sessions(
        &server,
        json!([session_json("s1", "Biology"), session_json("s2", "Chemistry")]),
    )
    .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();
    sessions.set_current_session_id("s2");

    sessions.refresh_sessions().await.unwrap();

    assert_eq!(sessions.current_session_id().as_deref(), Some("s2"));
}

#[rstest]
#[case::keep(SelectionPolicy::Keep, "gone")]
#[case::revalidate(SelectionPolicy::Revalidate, "s1")]
#[tokio::test]
async fn test_stale_selection_follows_policy(
    #[case] policy: SelectionPolicy,
    #[case] expected: &str,
) {
    let server = MockServer::start().await;
    mount_sessions(
        &server,
        json!([session_json("s1", "Biology"), session_json("s2", "Chemistry")]),
    )
    .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, policy).await.unwrap();
    sessions.set_current_session_id("gone");

    sessions.refresh_sessions().await.unwrap();

    assert_eq!(sessions.current_session_id().as_deref(), Some(expected));
}

#[tokio::test]
async fn test_create_new_session_selects_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .and(body_json(json!({"title": "Biology"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json("s1", "Biology")))
        .expect(1)
        .mount(&server)
        .await;
    mount_sessions(&server, json!([session_json("s1", "Biology")])).await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();
    assert!(sessions.current_session_id().is_none());

    let created = sessions.create_new_session("  Biology ").await.unwrap();

    assert_eq!(created.id, "s1");
    assert_eq!(sessions.current_session_id().as_deref(), Some("s1"));
    assert_eq!(sessions.sessions().len(), 1);
}

#[tokio::test]
async fn test_create_new_session_replaces_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([session_json("s0", "Old")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json("s1", "New")))
        .mount(&server)
        .await;
    mount_sessions(
        &server,
        json!([session_json("s0", "Old"), session_json("s1", "New")]),
    )
    .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();
    assert_eq!(sessions.current_session_id().as_deref(), Some("s0"));

    sessions.create_new_session("New").await.unwrap();

    assert_eq!(sessions.current_session_id().as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_blank_title_is_rejected_without_request() {
    let server = MockServer::start().await;
    mount_sessions(&server, json!([])).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();

    let err = sessions.create_new_session("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn test_failed_refresh_keeps_cached_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([session_json("s1", "Biology")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_json("database unavailable")))
        .mount(&server)
        .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();

    let err = sessions.refresh_sessions().await.unwrap_err();

    assert_eq!(err.detail(), Some("database unavailable"));
    assert_eq!(sessions.sessions().len(), 1);
    assert_eq!(sessions.current_session_id().as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_session_failure_on_connect_is_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let auth = signed_in(&server);
    let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep)
        .await
        .unwrap();

    assert!(sessions.sessions().is_empty());
    assert!(sessions.current_session_id().is_none());
}
