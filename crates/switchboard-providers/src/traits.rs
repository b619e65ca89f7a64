//! Request types and the `Adapter` trait every backend implements.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::registry::BackendSpec;
use crate::transport::{Body, HttpRequest};

// ─────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────

/// Per-call knobs. Every field is optional; adapters fill in their own
/// defaults.
#[derive(Clone, Default, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature (default 0.0).
    pub temperature: Option<f64>,
    /// Maximum tokens to generate (default depends on the backend).
    pub max_tokens: Option<u32>,
    /// System-role preamble.
    pub system: Option<String>,
    /// Azure resource name.
    pub resource: Option<String>,
    /// Azure deployment name.
    pub deployment: Option<String>,
    /// Ollama host (e.g. `http://192.168.1.20:11434`).
    pub host: Option<String>,
    /// Endpoint override for any backend.
    pub endpoint: Option<String>,
    /// Extra HTTP headers sent with the request.
    pub headers: BTreeMap<String, String>,
    /// Name of the env var holding the custom backend's bearer token.
    pub token_env: Option<String>,
    /// Free-form pass-through fields for generic backends.
    pub extra: Map<String, Value>,
}

impl fmt::Debug for CompletionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header values may carry credentials.
        f.debug_struct("CompletionOptions")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system", &self.system.as_ref().map(|s| s.len()))
            .field("resource", &self.resource)
            .field("deployment", &self.deployment)
            .field("host", &self.host)
            .field("endpoint", &self.endpoint)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("token_env", &self.token_env)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set an option by name, as received from a `key=value` pair.
    ///
    /// Known keys go to their typed field; anything else lands in `extra`.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<(), ProviderError> {
        match key {
            "temperature" => {
                self.temperature = Some(as_f64(key, &value)?);
            }
            "max_tokens" => {
                let n = as_f64(key, &value)?;
                if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
                    return Err(ProviderError::Config(format!(
                        "option '{key}' expects a non-negative integer"
                    )));
                }
                self.max_tokens = Some(n as u32);
            }
            "system" => self.system = Some(as_string(&value)),
            "resource" => self.resource = Some(as_string(&value)),
            "deployment" => self.deployment = Some(as_string(&value)),
            "host" => self.host = Some(as_string(&value)),
            "endpoint" => self.endpoint = Some(as_string(&value)),
            "token_env" => self.token_env = Some(as_string(&value)),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Effective temperature.
    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(0.0)
    }

    /// Effective `max_tokens` for a backend.
    pub fn max_tokens_for(&self, spec: &BackendSpec) -> u32 {
        self.max_tokens.unwrap_or(spec.default_max_tokens)
    }

    /// System preamble, empty when unset.
    pub fn system_prompt(&self) -> &str {
        self.system.as_deref().unwrap_or("")
    }

    /// The generation-related options as a JSON map, for generic backends.
    ///
    /// Routing-only fields (endpoint, headers, token_env, …) are excluded.
    pub fn passthrough(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(t) = self.temperature {
            map.insert("temperature".into(), Value::from(t));
        }
        if let Some(n) = self.max_tokens {
            map.insert("max_tokens".into(), Value::from(n));
        }
        if let Some(ref s) = self.system {
            map.insert("system".into(), Value::from(s.clone()));
        }
        for (k, v) in &self.extra {
            map.insert(k.clone(), v.clone());
        }
        map
    }
}

fn as_f64(key: &str, value: &Value) -> Result<f64, ProviderError> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| ProviderError::Config(format!("option '{key}' expects a number")))
}

fn as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────

/// One completion call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompletionRequest {
    /// The prompt text.
    pub prompt: String,
    /// Backend identifier (`"openai"`, `"hf"`, `"auto"`, …). `None` defers to
    /// the environment override and then auto-detection.
    pub backend: Option<String>,
    /// Backend-specific model name.
    pub model: Option<String>,
    pub options: CompletionOptions,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }
}

// ─────────────────────────────────────────────
// Adapter trait
// ─────────────────────────────────────────────

/// A backend's request/response dialect.
///
/// Adapters never touch the network: they turn a [`CompletionRequest`] into
/// an [`HttpRequest`] and a response [`Body`] into text. The router owns the
/// transport in between.
pub trait Adapter: Send + Sync {
    /// Which backend this adapter speaks for.
    fn backend(&self) -> Backend;

    /// Static credential/endpoint metadata.
    fn spec(&self) -> &'static BackendSpec {
        self.backend().spec()
    }

    /// Look up the credential.
    ///
    /// Returns `Ok(None)` only when the credential is optional for this
    /// backend and unset.
    fn resolve_credential(&self, env: &dyn Environment) -> Result<Option<String>, ProviderError> {
        let spec = self.spec();
        match spec.credential(env) {
            Some(key) => Ok(Some(key)),
            None if spec.credential_required => Err(ProviderError::missing_credential(spec)),
            None => Ok(None),
        }
    }

    /// Build the outbound request. Fails fast with `ProviderError::Config`
    /// when a required credential or endpoint is missing.
    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError>;

    /// Pull plain text out of a response body, falling back to the
    /// serialized body when the expected field is missing.
    fn extract_text(&self, body: Body) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_known_keys() {
        let mut options = CompletionOptions::new();
        options.insert("temperature", json!(0.3)).unwrap();
        options.insert("max_tokens", json!("256")).unwrap();
        options.insert("system", json!("be brief")).unwrap();
        options.insert("host", json!("http://box:11434")).unwrap();

        assert_eq!(options.temperature, Some(0.3));
        assert_eq!(options.max_tokens, Some(256));
        assert_eq!(options.system_prompt(), "be brief");
        assert_eq!(options.host.as_deref(), Some("http://box:11434"));
        assert!(options.extra.is_empty());
    }

    #[test]
    fn insert_unknown_key_goes_to_extra() {
        let mut options = CompletionOptions::new();
        options.insert("top_p", json!(0.9)).unwrap();
        assert_eq!(options.extra.get("top_p"), Some(&json!(0.9)));
    }

    #[test]
    fn insert_rejects_bad_numbers() {
        let mut options = CompletionOptions::new();
        assert!(options.insert("temperature", json!("warm")).is_err());
        assert!(options.insert("max_tokens", json!(-1)).is_err());
        assert!(options.insert("max_tokens", json!(1.5)).is_err());
    }

    #[test]
    fn passthrough_excludes_routing_fields() {
        let mut options = CompletionOptions::new()
            .temperature(0.5)
            .endpoint("https://x.example")
            .header("X-Key", "secret");
        options.token_env = Some("MY_TOKEN".into());
        options.extra.insert("top_k".into(), json!(40));

        let map = options.passthrough();
        assert_eq!(map.get("temperature"), Some(&json!(0.5)));
        assert_eq!(map.get("top_k"), Some(&json!(40)));
        assert!(map.get("endpoint").is_none());
        assert!(map.get("token_env").is_none());
        assert!(map.get("headers").is_none());
    }

    #[test]
    fn debug_hides_header_values() {
        let options = CompletionOptions::new().header("Authorization", "Bearer sk-hidden");
        let rendered = format!("{options:?}");
        assert!(rendered.contains("Authorization"));
        assert!(!rendered.contains("sk-hidden"));
    }

    #[test]
    fn defaults() {
        let options = CompletionOptions::new();
        assert_eq!(options.temperature_or_default(), 0.0);
        assert_eq!(options.max_tokens_for(Backend::OpenAi.spec()), 1024);
        assert_eq!(options.max_tokens_for(Backend::HuggingFace.spec()), 512);
        assert_eq!(options.system_prompt(), "");
    }

    #[test]
    fn request_builder() {
        let req = CompletionRequest::new("hi")
            .backend("openai")
            .model("gpt-4o")
            .options(CompletionOptions::new().max_tokens(10));
        assert_eq!(req.prompt, "hi");
        assert_eq!(req.backend.as_deref(), Some("openai"));
        assert_eq!(req.model.as_deref(), Some("gpt-4o"));
        assert_eq!(req.options.max_tokens, Some(10));
    }
}
