//! Anthropic text completions (`/v1/complete`).

use serde_json::json;
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

/// Value of the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Human/Assistant framed prompt with an `x-api-key` header.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    /// Frame `prompt` as a single Human turn. A system preamble, if any,
    /// precedes the first turn.
    fn framed_prompt(system: &str, prompt: &str) -> String {
        if system.is_empty() {
            format!("\n\nHuman: {prompt}\n\nAssistant:")
        } else {
            format!("{system}\n\nHuman: {prompt}\n\nAssistant:")
        }
    }
}

impl Adapter for AnthropicAdapter {
    fn backend(&self) -> Backend {
        Backend::Anthropic
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError> {
        let spec = self.spec();
        let key = spec.require_credential(env)?;
        let url = spec.require_endpoint(request.options.endpoint.as_deref(), env)?;
        let model = spec.model(request.model.as_deref(), env).unwrap_or_default();
        let options = &request.options;

        let payload = json!({
            "model": model,
            "prompt": Self::framed_prompt(options.system_prompt(), &request.prompt),
            "max_tokens_to_sample": options.max_tokens_for(spec),
            "temperature": options.temperature_or_default(),
        });

        Ok(HttpRequest::post(url)
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(payload)
            .extra_headers(&options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        normalize::extract(body, &["/completion"])
    }
}
