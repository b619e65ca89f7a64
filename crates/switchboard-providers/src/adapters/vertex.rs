//! Google Vertex AI / Gemini prediction endpoints.

use serde_json::json;
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

/// Bearer access token plus a caller-supplied full endpoint URL.
///
/// No path is appended: the URL already names project, region and model.
#[derive(Clone, Copy, Debug, Default)]
pub struct VertexAdapter;

impl Adapter for VertexAdapter {
    fn backend(&self) -> Backend {
        Backend::Vertex
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError> {
        let spec = self.spec();
        let token = spec.require_credential(env)?;
        let url = spec.require_endpoint(request.options.endpoint.as_deref(), env)?;
        let options = &request.options;

        let payload = json!({
            "input": request.prompt,
            "parameters": {
                "temperature": options.temperature_or_default(),
                "maxOutputTokens": options.max_tokens_for(spec),
            },
        });

        Ok(HttpRequest::post(url)
            .bearer(&token)
            .json(payload)
            .extra_headers(&options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        normalize::extract(
            body,
            &[
                "/predictions/0/content",
                "/candidates/0/content/parts/0/text",
                "/text",
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchboard_core::MapEnvironment;

    const URL: &str =
        "https://us-central1-aiplatform.googleapis.com/v1/projects/p/locations/us-central1/publishers/google/models/text-bison:predict";

    #[test]
    fn uses_endpoint_verbatim() {
        let env = MapEnvironment::new()
            .set("GCP_ACCESS_TOKEN", "ya29.x")
            .set("VERTEX_MODEL_ENDPOINT", URL);
        let http = VertexAdapter
            .build_request(&CompletionRequest::new("hi"), &env)
            .unwrap();
        assert_eq!(http.url, URL);
        assert_eq!(http.header_value("Authorization"), Some("Bearer ya29.x"));
        assert_eq!(http.payload["input"], "hi");
        assert_eq!(http.payload["parameters"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn missing_endpoint_is_config_error() {
        let env = MapEnvironment::new().set("GOOGLE_OAUTH_ACCESS_TOKEN", "ya29.x");
        let err = VertexAdapter
            .build_request(&CompletionRequest::new("hi"), &env)
            .unwrap_err();
        assert_eq!(err.category(), "ConfigError");
        assert!(err.to_string().contains("GEMINI_API_ENDPOINT"));
    }

    #[test]
    fn extracts_prediction_shapes() {
        let body = Body::Json(json!({"predictions": [{"content": "pred"}]}));
        assert_eq!(VertexAdapter.extract_text(body), "pred");

        let body = Body::Json(json!({
            "candidates": [{"content": {"parts": [{"text": "gem"}]}}]
        }));
        assert_eq!(VertexAdapter.extract_text(body), "gem");

        let body = Body::Json(json!({"predictions": []}));
        assert_eq!(VertexAdapter.extract_text(body), r#"{"predictions":[]}"#);
    }
}
