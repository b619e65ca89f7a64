//! Zhipu GLM.

use serde_json::json;
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

#[derive(Clone, Copy, Debug, Default)]
pub struct ZhipuAdapter;

impl Adapter for ZhipuAdapter {
    fn backend(&self) -> Backend {
        Backend::Zhipu
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

        let payload = json!({
            "text": request.prompt,
            "model": model,
            "max_tokens": request.options.max_tokens_for(spec),
        });

        Ok(HttpRequest::post(url)
            .bearer(&key)
            .json(payload)
            .extra_headers(&request.options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        match body {
            Body::Json(value) => normalize::text_at(&value, "/text")
                .or_else(|| {
                    value
                        .get("data")
                        .filter(|data| !normalize::is_blank(data))
                        .map(normalize::serialize)
                })
                .unwrap_or_else(|| normalize::serialize(&value)),
            text => normalize::extract(text, &[]),
        }
    }
}
