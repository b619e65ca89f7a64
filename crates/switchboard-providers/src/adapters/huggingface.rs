//! Hugging Face Inference API.

use serde_json::json;
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

/// `POST {base}/models/{model}` with `{inputs, parameters}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HuggingFaceAdapter;

impl Adapter for HuggingFaceAdapter {
    fn backend(&self) -> Backend {
        Backend::HuggingFace
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError> {
        let spec = self.spec();
        let key = spec.require_credential(env)?;
        let base = spec.require_endpoint(request.options.endpoint.as_deref(), env)?;
        let model = spec.model(request.model.as_deref(), env).unwrap_or_default();

        let url = format!(
            "{}/models/{}",
            base.trim_end_matches('/'),
            urlencoding::encode(model.trim())
        );
        let payload = json!({
            "inputs": request.prompt,
            "parameters": {
                "max_new_tokens": request.options.max_tokens_for(spec),
            },
        });

        Ok(HttpRequest::post(url)
            .bearer(&key)
            .header("Accept", "application/json")
            .json(payload)
            .extra_headers(&request.options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        // Text-generation models answer with a list, some pipelines with an object.
        normalize::extract(body, &["/0/generated_text", "/generated_text"])
    }
}
