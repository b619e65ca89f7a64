//! Generic prompt-in/text-out HTTP backends.
//!
//! One adapter serves the user-configured `custom` endpoint and the hosted
//! vendors that share its `{prompt, ...options}` dialect.

use serde_json::Value;
use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;
use crate::normalize;
use crate::registry::CUSTOM_KEY_NAME_ENV;
use crate::traits::{Adapter, CompletionRequest};
use crate::transport::{Body, HttpRequest};

#[derive(Clone, Copy, Debug)]
pub struct GenericAdapter {
    backend: Backend,
}

impl GenericAdapter {
    pub const CUSTOM: GenericAdapter = GenericAdapter::new(Backend::Custom);
    pub const HACKLIBERTY: GenericAdapter = GenericAdapter::new(Backend::HackLiberty);
    pub const DEEPSEEK: GenericAdapter = GenericAdapter::new(Backend::DeepSeek);
    pub const PERPLEXITY: GenericAdapter = GenericAdapter::new(Backend::Perplexity);
    pub const QAI: GenericAdapter = GenericAdapter::new(Backend::Qai);

    pub const fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Name of the env var holding the custom token: `token_env` option,
    /// then `PROVIDER_CUSTOM_KEY_NAME`, then the registry binding.
    fn custom_token_var(request: &CompletionRequest, env: &dyn Environment) -> Option<String> {
        request
            .options
            .token_env
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .or_else(|| env.get_non_empty(CUSTOM_KEY_NAME_ENV).map(|n| n.trim().to_string()))
    }

    fn token(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<Option<String>, ProviderError> {
        if self.backend == Backend::Custom {
            if let Some(name) = Self::custom_token_var(request, env) {
                return Ok(env.get_non_empty(&name));
            }
        }
        self.resolve_credential(env)
    }
}

impl Adapter for GenericAdapter {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        env: &dyn Environment,
    ) -> Result<HttpRequest, ProviderError> {
        let spec = self.spec();
        let token = self.token(request, env)?;
        let url = spec.require_endpoint(request.options.endpoint.as_deref(), env)?;

        let mut payload = request.options.passthrough();
        payload.insert("prompt".into(), Value::from(request.prompt.clone()));
        if let Some(ref model) = request.model {
            payload.entry("model").or_insert_with(|| Value::from(model.clone()));
        }

        let mut http = HttpRequest::post(url).json(Value::Object(payload));
        if let Some(token) = token {
            http = http.bearer(&token);
        }
        Ok(http.extra_headers(&request.options.headers))
    }

    fn extract_text(&self, body: Body) -> String {
        normalize::extract(body, &["/response", "/text"])
    }
}
