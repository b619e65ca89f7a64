//! OpenAI chat completions.

use serde_json::json;
use switchboard_core::Environment;

use super::{chat_messages, CHAT_CONTENT};
use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

/// `POST /v1/chat/completions` with a bearer key.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenAiAdapter;

impl Adapter for OpenAiAdapter {
    fn backend(&self) -> Backend {
        Backend::OpenAi
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
            "messages": chat_messages(options.system_prompt(), &request.prompt),
            "temperature": options.temperature_or_default(),
            "max_tokens": options.max_tokens_for(spec),
        });

        Ok(HttpRequest::post(url)
            .bearer(&key)
            .json(payload)
            .extra_headers(&options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        normalize::extract(body, &[CHAT_CONTENT])
    }
}
