//! Router tests against a scripted backend.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use gemchat_ai::testing::ScriptedBackend;
use gemchat_ai::{AiError, GenerativeBackend, Reply, Session};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use super::*;

fn state_over(backend: &Arc<ScriptedBackend>, timeout: Duration) -> AppState {
    AppState::new(
        Session::from_shared(backend.clone() as Arc<dyn GenerativeBackend>),
        timeout,
    )
}

fn post_chat(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn chat_returns_flattened_reply() {
    let backend = Arc::new(ScriptedBackend::new().with_text("hi there"));
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(state, post_chat(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "hi there\n" }));
    assert_eq!(backend.requests()[0].text(), "hello");
}

#[tokio::test]
async fn missing_message_is_bad_request() {
    let backend = Arc::new(ScriptedBackend::new());
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(state, post_chat("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let backend = Arc::new(ScriptedBackend::new());
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(state, post_chat("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_string_message_is_bad_request() {
    let backend = Arc::new(ScriptedBackend::new());
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, _) = send(state, post_chat(r#"{"message": 42}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_content_type_is_bad_request() {
    let backend = Arc::new(ScriptedBackend::new());
    let state = state_over(&backend, Duration::from_secs(5));
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .body(Body::from(r#"{"message": "hello"}"#))
        .unwrap();

    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn blank_message_never_reaches_session() {
    let backend = Arc::new(ScriptedBackend::new().with_text("unused"));
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(state, post_chat(r#"{"message": "   "}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "message must not be empty" }));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn backend_failure_is_server_error_with_cause() {
    let backend = Arc::new(
        ScriptedBackend::new().with_error(AiError::ApiError("HTTP 503: model overloaded".into())),
    );
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(state, post_chat(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("model overloaded"), "got: {error}");
}

#[tokio::test]
async fn zero_candidates_is_server_error() {
    let backend = Arc::new(ScriptedBackend::new().with_reply(Reply::default()));
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(state, post_chat(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no candidates"));
}

#[tokio::test]
async fn slow_backend_hits_exchange_deadline() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_text("too late")
            .with_delay(Duration::from_secs(30)),
    );
    let state = state_over(&backend, Duration::from_millis(50));

    let (status, body) = send(state, post_chat(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn shutdown_cancels_exchanges() {
    let backend = Arc::new(ScriptedBackend::new().with_text("unused"));
    let state = state_over(&backend, Duration::from_secs(5));
    state.shutdown.cancel();

    let (status, body) = send(state, post_chat(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "exchange cancelled" }));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn concurrent_requests_share_one_session() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_text("a")
            .with_text("b")
            .with_delay(Duration::from_millis(50)),
    );
    let state = state_over(&backend, Duration::from_secs(5));

    let (first, second) = tokio::join!(
        send(state.clone(), post_chat(r#"{"message": "one"}"#)),
        send(state.clone(), post_chat(r#"{"message": "two"}"#)),
    );

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    assert_eq!(backend.call_count(), 2);
    assert_eq!(backend.max_in_flight(), 2);
}

#[tokio::test]
async fn index_serves_landing_page() {
    let backend = Arc::new(ScriptedBackend::new());
    let state = state_over(&backend, Duration::from_secs(5));

    let response = create_router(state)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<form"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn health_reports_model() {
    let backend = Arc::new(ScriptedBackend::new().with_model("gemini-1.5-flash"));
    let state = state_over(&backend, Duration::from_secs(5));

    let (status, body) = send(
        state,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "model": "gemini-1.5-flash" }));
}

#[tokio::test]
async fn get_on_chat_is_not_allowed() {
    let backend = Arc::new(ScriptedBackend::new());
    let state = state_over(&backend, Duration::from_secs(5));

    let response = create_router(state)
        .oneshot(Request::get("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn serve_on_stops_when_shutdown_is_cancelled() {
    let backend = Arc::new(ScriptedBackend::new().with_model("gemini-1.5-flash"));
    let state = state_over(&backend, Duration::from_secs(5));
    let shutdown = state.shutdown.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_on(listener, state));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "got: {raw}");
    assert!(raw.contains("gemini-1.5-flash"));

    shutdown.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
