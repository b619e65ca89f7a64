//! Ollama local generation (`/api/generate`).

use serde_json::json;
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

/// Non-streaming generate call against a local or LAN host.
///
/// The host comes from the `host` option, then the `endpoint` option, then
/// `OLLAMA_HOST`, then `http://localhost:11434`. A bearer token is sent only
/// when `OLLAMA_API_KEY` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct OllamaAdapter;

impl Adapter for OllamaAdapter {
    fn backend(&self) -> Backend {
        Backend::Ollama
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError> {
        let spec = self.spec();
        let options = &request.options;
        let host_override = options
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .or(options.endpoint.as_deref());
        let host = spec.require_endpoint(host_override, env)?;
        let model = spec.model(request.model.as_deref(), env).unwrap_or_default();

        let url = format!("{}/api/generate", host.trim().trim_end_matches('/'));
        let mut payload = json!({
            "model": model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "num_predict": options.max_tokens_for(spec),
                "temperature": options.temperature_or_default(),
            },
        });
        if !options.system_prompt().is_empty() {
            payload["system"] = json!(options.system_prompt());
        }

        let mut http = HttpRequest::post(url).json(payload);
        if let Some(key) = self.resolve_credential(env)? {
            http = http.bearer(&key);
        }
        Ok(http.extra_headers(&options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        normalize::extract(body, &["/response", "/text"])
    }
}
