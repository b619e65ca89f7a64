//! Azure OpenAI — deployment-scoped chat completions.

use serde_json::json;
use switchboard_core::Environment;

use super::{chat_messages, CHAT_CONTENT};
use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

/// API version pinned in every Azure URL.
pub const AZURE_API_VERSION: &str = "2023-10-01-preview";

const RESOURCE_ENV: &str = "AZURE_OPENAI_RESOURCE";
const DEPLOYMENT_ENVS: &[&str] = &["AZURE_OPENAI_DEPLOYMENT", "AZURE_OPENAI_MODEL"];

/// `POST {base}/openai/deployments/{deployment}/chat/completions?api-version=…`
/// authenticated with an `api-key` header.
///
/// The base is `https://{resource}.openai.azure.com` unless an endpoint
/// override supplies it directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct AzureAdapter;

impl AzureAdapter {
    fn base_url(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Option<String> {
        let options = &request.options;
        if let Some(base) = self.spec().endpoint(options.endpoint.as_deref(), env) {
            return Some(base);
        }
        options
            .resource
            .clone()
            .filter(|r| !r.trim().is_empty())
            .or_else(|| env.get_non_empty(RESOURCE_ENV))
            .map(|resource| format!("https://{}.openai.azure.com", resource.trim()))
    }

    fn deployment(&self, request: &CompletionRequest, env: &dyn Environment) -> Option<String> {
        request
            .model
            .clone()
            .or_else(|| request.options.deployment.clone())
            .filter(|d| !d.trim().is_empty())
            .or_else(|| env.first_non_empty(DEPLOYMENT_ENVS))
    }
}

impl Adapter for AzureAdapter {
    fn backend(&self) -> Backend {
        Backend::Azure
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError> {
        let spec = self.spec();
        let key = spec.credential(env);
        let base = self.base_url(request, env);
        let deployment = self.deployment(request, env);

        let (key, base, deployment) = match (key, base, deployment) {
            (Some(k), Some(b), Some(d)) => (k, b, d),
            _ => {
                return Err(ProviderError::Config(
                    "AZURE_OPENAI_KEY + AZURE_OPENAI_RESOURCE + AZURE_OPENAI_DEPLOYMENT \
                     (or AZURE_OPENAI_MODEL) required"
                        .to_string(),
                ))
            }
        };

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base.trim_end_matches('/'),
            deployment.trim(),
            AZURE_API_VERSION
        );
        let options = &request.options;
        let payload = json!({
            "messages": chat_messages(options.system_prompt(), &request.prompt),
            "temperature": options.temperature_or_default(),
            "max_tokens": options.max_tokens_for(spec),
        });

        Ok(HttpRequest::post(url)
            .header("api-key", key)
            .json(payload)
            .extra_headers(&options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        normalize::extract(body, &[CHAT_CONTENT])
    }
}
