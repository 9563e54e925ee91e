//! End-to-end session lifecycle over the HTTP surface
//!
//! Covers the create -> grow -> list -> delete sequence: a session appears on
//! the first message, history grows in insertion order, deletion cascades to
//! messages, and subsequent lookups report not-found.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use modelgate::config::{Config, Secrets};
use modelgate::handlers::chat::{ChatResponse, HistoryResponse, SessionsResponse};
use modelgate::handlers::{self, AppState};
use modelgate::store::MessageRole;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn app_with_mock_providers() -> (Router, MockServer, tempfile::TempDir) {
    let provider = MockServer::start().await;
    let dir = tempfile::tempdir().expect("should create temp dir");

    // One mock serves both wire formats; each client only reads its own shape
    let body = serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": "ответ"}}],
        "content": [{"type": "text", "text": "ответ"}]
    });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&provider)
        .await;

    let config = Config::from_str(&format!(
        r#"
[server]
host = "127.0.0.1"
port = 8000
request_timeout_seconds = 5

[providers]
openai_base_url = "{0}"
anthropic_base_url = "{0}"
"#,
        provider.uri()
    ))
    .expect("should parse test config");

    let secrets = Secrets::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "ANTHROPIC_API_KEY" => Some("sk-ant-test".to_string()),
        "DATABASE_URL" => Some(format!("sqlite://{}/chat.db", dir.path().display())),
        _ => None,
    })
    .expect("test secrets");

    let state = AppState::new(Arc::new(config), &secrets)
        .await
        .expect("should create AppState");

    (handlers::router(state), provider, dir)
}

async fn post_chat(app: &Router, body: String) -> ChatResponse {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat/")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("valid ChatResponse")
}

async fn get_history(app: &Router, session_id: &str) -> (StatusCode, Option<HistoryResponse>) {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/chat/history/{session_id}"))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if !status.is_success() {
        return (status, None);
    }
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, Some(serde_json::from_slice(&bytes).unwrap()))
}

#[tokio::test]
async fn history_grows_in_insertion_order() {
    let (app, _provider, _dir) = app_with_mock_providers().await;

    let first = post_chat(&app, r#"{"message": "первое сообщение"}"#.to_string()).await;
    let session_id = first.session_id.clone();

    let second = post_chat(
        &app,
        format!(r#"{{"message": "второе сообщение", "session_id": "{session_id}"}}"#),
    )
    .await;
    assert_eq!(second.session_id, session_id);

    let (status, history) = get_history(&app, &session_id).await;
    assert_eq!(status, StatusCode::OK);
    let messages = history.unwrap().messages;

    // Two exchanges: user/ai pairs in arrival order
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "первое сообщение");
    assert_eq!(messages[1].role, MessageRole::Ai);
    assert_eq!(messages[2].role, MessageRole::User);
    assert_eq!(messages[2].content, "второе сообщение");
    assert_eq!(messages[3].role, MessageRole::Ai);

    for message in &messages {
        assert_eq!(message.session_id, session_id);
    }
}

#[tokio::test]
async fn history_limit_caps_result() {
    let (app, _provider, _dir) = app_with_mock_providers().await;

    let first = post_chat(&app, r#"{"message": "раз"}"#.to_string()).await;
    let session_id = first.session_id.clone();
    post_chat(
        &app,
        format!(r#"{{"message": "два", "session_id": "{session_id}"}}"#),
    )
    .await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/chat/history/{session_id}?limit=1"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let history: HistoryResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(history.messages.len(), 1);
    assert_eq!(history.messages[0].content, "раз");
}

#[tokio::test]
async fn sessions_listing_orders_by_recency() {
    let (app, _provider, _dir) = app_with_mock_providers().await;

    let first = post_chat(&app, r#"{"message": "сессия один"}"#.to_string()).await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = post_chat(&app, r#"{"message": "сессия два"}"#.to_string()).await;
    assert_ne!(first.session_id, second.session_id);

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    // Writing to the first session bumps it back to the top
    post_chat(
        &app,
        format!(
            r#"{{"message": "ещё одно", "session_id": "{}"}}"#,
            first.session_id
        ),
    )
    .await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/chat/sessions")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let listing: SessionsResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listing.sessions.len(), 2);
    assert_eq!(listing.sessions[0].id, first.session_id);
    assert_eq!(listing.sessions[1].id, second.session_id);
    for session in &listing.sessions {
        assert!(session.updated_at >= session.created_at);
    }
}

#[tokio::test]
async fn delete_cascades_and_subsequent_history_is_404() {
    let (app, _provider, _dir) = app_with_mock_providers().await;

    let chat = post_chat(&app, r#"{"message": "удали меня потом"}"#.to_string()).await;
    let session_id = chat.session_id.clone();

    let (status, history) = get_history(&app, &session_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.unwrap().messages.len(), 2);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/chat/session/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = get_history(&app, &session_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is also not-found
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/chat/session/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
