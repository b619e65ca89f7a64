//! End-to-end routing over real HTTP against a mock server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use switchboard_core::MapEnvironment;
use switchboard_providers::{CompletionOptions, CompletionRequest, HttpTransport, Router};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_router(env: MapEnvironment) -> Router {
    Router::new(Arc::new(env), Arc::new(HttpTransport::new(false)))
}

#[tokio::test]
async fn test_openai_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-e2e"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "max_tokens": 1024})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = MapEnvironment::new()
        .set("OPENAI_API_KEY", "sk-e2e")
        .set("OPENAI_ENDPOINT", format!("{}/v1/chat/completions", server.uri()));
    let out = http_router(env)
        .route(&CompletionRequest::new("hello").backend("openai"))
        .await;
    assert_eq!(out, "hi");
}

#[tokio::test]
async fn test_custom_auto_detected_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gen"))
        .and(body_partial_json(json!({"prompt": "ping", "top_k": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let env = MapEnvironment::new().set("PROVIDER_CUSTOM_URL", format!("{}/gen", server.uri()));
    let mut options = CompletionOptions::new();
    options.insert("top_k", json!(3)).unwrap();
    let out = http_router(env)
        .route(&CompletionRequest::new("ping").options(options))
        .await;
    assert_eq!(out, "pong");
}

#[tokio::test]
async fn test_caller_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-Team", "blue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .mount(&server)
        .await;

    let env = MapEnvironment::new().set("OLLAMA_HOST", server.uri());
    let request = CompletionRequest::new("hi").options(CompletionOptions::new().header("X-Team", "blue"));
    assert_eq!(http_router(env).route(&request).await, "ok");
}

#[tokio::test]
async fn test_normalization_gap_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let env = MapEnvironment::new()
        .set("OPENAI_API_KEY", "sk-e2e")
        .set("OPENAI_ENDPOINT", server.uri());
    let out = http_router(env)
        .route(&CompletionRequest::new("hi").backend("openai"))
        .await;
    assert_eq!(out, r#"{"choices":[]}"#);
}

#[tokio::test]
async fn test_empty_success_body_is_not_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let env = MapEnvironment::new().set("PROVIDER_CUSTOM_URL", server.uri());
    let out = http_router(env)
        .route(&CompletionRequest::new("hi").backend("custom"))
        .await;
    assert_eq!(out, r#""""#);
}

#[tokio::test]
async fn test_vendor_without_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let env = MapEnvironment::new().set("DEEPSEEK_ENDPOINT", server.uri());
    let out = http_router(env)
        .route(&CompletionRequest::new("hi").backend("deepseek"))
        .await;
    assert_eq!(out, "ok");

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.iter().all(|r| !r.headers.contains_key("authorization")));
}

#[tokio::test]
async fn test_status_error_is_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let env = MapEnvironment::new()
        .set("DEEPSEEK_KEY", "ds-secret")
        .set("DEEPSEEK_ENDPOINT", format!("{}/generate?key=ds-secret", server.uri()));
    let out = http_router(env)
        .route(&CompletionRequest::new("hi").backend("deepseek"))
        .await;
    assert!(out.starts_with("[provider-error] deepseek: TransportError - "), "{out}");
    assert!(out.contains("503"));
    assert!(!out.contains("ds-secret"));
}

#[tokio::test]
async fn test_missing_credential_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = MapEnvironment::new().set("ANTHROPIC_ENDPOINT", server.uri());
    let out = http_router(env)
        .route(&CompletionRequest::new("hi").backend("anthropic"))
        .await;
    assert!(out.starts_with("[provider-error] anthropic: ConfigError - "), "{out}");
    assert!(out.contains("ANTHROPIC_API_KEY"));
}

#[tokio::test]
async fn test_unknown_backend() {
    let out = http_router(MapEnvironment::new())
        .route(&CompletionRequest::new("hi").backend("not-a-real-backend"))
        .await;
    assert!(out.starts_with("[provider-error] not-a-real-backend: UnknownBackend - "), "{out}");
}

#[tokio::test]
async fn test_server_slower_than_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let env = MapEnvironment::new().set("OLLAMA_HOST", server.uri());
    let router = http_router(env).with_timeout(Duration::from_secs(1));
    let started = Instant::now();
    let out = router.route(&CompletionRequest::new("hi")).await;
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(out.starts_with("[provider-error] ollama: TransportError - "), "{out}");
}
