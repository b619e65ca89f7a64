//! HTTP transport — one bounded POST per call.
//!
//! Raises on non-2xx, best-effort parses the body as JSON and falls back to
//! raw text. Retries are limited to a single extra attempt on connection
//! failures; timeouts and HTTP status errors are never retried.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use switchboard_core::config::schema::MAX_TIMEOUT_SECS;
use switchboard_core::utils::truncate_string;
use tracing::{debug, warn};

use crate::error::{display_url, TransportError};

// ─────────────────────────────────────────────
// Request / Body
// ─────────────────────────────────────────────

/// An outbound JSON POST.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub payload: Value,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("url", &display_url(&self.url))
            .field("headers", &names)
            .finish_non_exhaustive()
    }
}

impl HttpRequest {
    /// A POST to `url` with an empty JSON object body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            payload: Value::Object(Default::default()),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn json(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Append caller-supplied headers (they are sent after the adapter's own).
    pub fn extra_headers<'a, I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (k, v) in headers {
            self.headers.push((k.clone(), v.clone()));
        }
        self
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    /// Parse as JSON when possible, otherwise keep the raw text.
    pub fn parse(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text),
        }
    }
}

// ─────────────────────────────────────────────
// Transport trait
// ─────────────────────────────────────────────

/// Performs one outbound call. Implementations must honour `timeout`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<Body, TransportError>;
}

/// Clamp a requested timeout into `1s..=MAX_TIMEOUT_SECS`.
pub fn bounded_timeout(timeout: Duration) -> Duration {
    timeout.clamp(Duration::from_secs(1), Duration::from_secs(MAX_TIMEOUT_SECS))
}

// ─────────────────────────────────────────────
// HttpTransport
// ─────────────────────────────────────────────

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Retry once when the connection could not be established.
    retry_connect_errors: bool,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("retry_connect_errors", &self.retry_connect_errors)
            .finish()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HttpTransport {
    pub fn new(retry_connect_errors: bool) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            client,
            retry_connect_errors,
        }
    }

    async fn send_once(
        &self,
        request: &HttpRequest,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> Result<Body, TransportError> {
        let url = display_url(&request.url);

        let response = self
            .client
            .post(&request.url)
            .headers(headers.clone())
            .json(&request.payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, &url, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url, status });
        }

        let text = response
            .text()
            .await
            .map_err(|e| classify(e, &url, timeout))?;
        Ok(Body::parse(text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<Body, TransportError> {
        let timeout = bounded_timeout(timeout);
        let headers = build_headers(&request.headers);
        let attempts = if self.retry_connect_errors { 2 } else { 1 };

        let mut attempt = 1;
        loop {
            match self.send_once(request, &headers, timeout).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    debug!(
                        url = %display_url(&request.url),
                        attempt,
                        error = %truncate_string(&e.to_string(), 200),
                        "HTTP POST failed"
                    );
                    if attempt < attempts && e.is_transient() {
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }
}

/// Convert header pairs, dropping invalid ones. Values are never logged.
fn build_headers(pairs: &[(String, String)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (key, value) in pairs {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(mut val)) => {
                val.set_sensitive(true);
                headers.insert(name, val);
            }
            _ => warn!(header = %key, "Dropping invalid header"),
        }
    }
    headers
}

fn classify(error: reqwest::Error, url: &str, timeout: Duration) -> TransportError {
    let url = url.to_string();
    if error.is_timeout() {
        return TransportError::Timeout {
            url,
            timeout_secs: timeout.as_secs(),
        };
    }
    let is_connect = error.is_connect();
    // reqwest embeds the full URL (query included) in its message.
    let message = error_chain(&error.without_url());
    if is_connect {
        TransportError::Connect { url, message }
    } else {
        TransportError::Request { url, message }
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_body_parse_json() {
        assert_eq!(
            Body::parse(r#"{"text":"hi"}"#.to_string()),
            Body::Json(json!({"text": "hi"}))
        );
    }

    #[test]
    fn test_body_parse_text() {
        assert_eq!(
            Body::parse("plain words".to_string()),
            Body::Text("plain words".to_string())
        );
    }

    #[test]
    fn test_request_debug_redacts_headers() {
        let req = HttpRequest::post("https://api.example/v1?key=abc").bearer("sk-top-secret");
        let rendered = format!("{req:?}");
        assert!(rendered.contains("Authorization"));
        assert!(!rendered.contains("sk-top-secret"));
        assert!(!rendered.contains("key=abc"));
    }

    #[test]
    fn test_header_value_lookup() {
        let req = HttpRequest::post("http://x").header("x-api-key", "k");
        assert_eq!(req.header_value("X-API-KEY"), Some("k"));
        assert_eq!(req.header_value("Content-Type"), Some("application/json"));
        assert!(req.header_value("missing").is_none());
    }

    #[test]
    fn test_build_headers_drops_invalid() {
        let headers = build_headers(&[
            ("X-Good".into(), "ok".into()),
            ("Bad Header".into(), "v".into()),
            ("X-Bad-Value".into(), "line\nbreak".into()),
        ]);
        assert!(headers.contains_key("x-good"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_bounded_timeout() {
        assert_eq!(bounded_timeout(Duration::ZERO), Duration::from_secs(1));
        assert_eq!(
            bounded_timeout(Duration::from_secs(3600)),
            Duration::from_secs(MAX_TIMEOUT_SECS)
        );
        assert_eq!(bounded_timeout(Duration::from_secs(12)), Duration::from_secs(12));
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_json(json!({"prompt": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "world"})))
            .mount(&server)
            .await;

        let req = HttpRequest::post(format!("{}/generate", server.uri()))
            .bearer("tok")
            .json(json!({"prompt": "hello"}));
        let body = HttpTransport::default()
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, Body::Json(json!({"text": "world"})));
    }

    #[tokio::test]
    async fn test_send_text_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let req = HttpRequest::post(server.uri());
        let body = HttpTransport::default()
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, Body::Text("not json at all".to_string()));
    }

    #[tokio::test]
    async fn test_send_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"error": "rate limited"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let req = HttpRequest::post(server.uri());
        let err = HttpTransport::default()
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status, .. } if status.as_u16() == 429));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_send_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"text": "late"}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let req = HttpRequest::post(server.uri());
        let started = Instant::now();
        let err = HttpTransport::default()
            .send(&req, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout { timeout_secs: 1, .. }));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_send_connect_error() {
        // Point to a port that's not listening
        let req = HttpRequest::post("http://127.0.0.1:1/generate");
        let err = HttpTransport::new(false)
            .send(&req, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
        assert!(err.is_transient());
    }
}
