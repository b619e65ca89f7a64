//! The completion router — resolve a backend, call it, flatten failures.
//!
//! [`Router::complete`] returns a typed [`ProviderFailure`]; [`Router::route`]
//! renders it as the single-line `[provider-error] …` string so callers that
//! only want text never see an error value.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use switchboard_core::config::{load_config, RouterConfig};
use switchboard_core::{Environment, ProcessEnvironment};
use tracing::debug;

use crate::adapters::adapter_for;
use crate::backend::{Backend, Selection};
use crate::detect::detect;
use crate::error::{display_url, scrub, ProviderError, ProviderFailure, TransportError};
use crate::registry::credential_values;
use crate::traits::{CompletionOptions, CompletionRequest};
use crate::transport::{bounded_timeout, HttpTransport, Transport};

/// Env var that picks the backend when the caller doesn't.
pub const PROVIDER_ENV: &str = "SWITCHBOARD_PROVIDER";

/// Routes completion requests to backends.
///
/// Holds only shared, read-only collaborators, so one router can serve
/// concurrent calls.
#[derive(Clone)]
pub struct Router {
    env: Arc<dyn Environment>,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}

impl Router {
    pub fn new(env: Arc<dyn Environment>, transport: Arc<dyn Transport>) -> Self {
        Self {
            env,
            transport,
            timeout: RouterConfig::default().timeout(),
        }
    }

    /// Process environment + `reqwest` transport, tuned by `config`.
    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(
            Arc::new(ProcessEnvironment),
            Arc::new(HttpTransport::new(config.retry_connect_errors)),
        )
        .with_timeout(config.timeout())
    }

    /// Per-call deadline, clamped to the accepted range.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = bounded_timeout(timeout);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The backend identifier a request resolves to, before parsing:
    /// explicit (non-empty) > `SWITCHBOARD_PROVIDER` > `auto`.
    pub fn requested_backend(&self, request: &CompletionRequest) -> String {
        request
            .backend
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from)
            .or_else(|| {
                self.env
                    .get_non_empty(PROVIDER_ENV)
                    .map(|b| b.trim().to_string())
            })
            .unwrap_or_else(|| "auto".to_string())
    }

    /// Resolve the concrete backend for `request`, running auto-detection
    /// when needed.
    pub fn resolve_backend(&self, request: &CompletionRequest) -> Result<Backend, ProviderError> {
        match self.requested_backend(request).parse::<Selection>()? {
            Selection::Backend(backend) => Ok(backend),
            Selection::Auto => Ok(detect(self.env.as_ref())),
        }
    }

    /// Run one completion, returning either the text or a categorized
    /// failure.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let backend = match self.resolve_backend(request) {
            Ok(backend) => backend,
            Err(e) => return Err(self.failure(&self.requested_backend(request), &e, request)),
        };
        debug!(
            backend = %backend,
            model = request.model.as_deref().unwrap_or("-"),
            "Routing completion"
        );

        self.call(backend, request)
            .await
            .map_err(|e| self.failure(backend.as_str(), &e, request))
    }

    /// Like [`complete`](Self::complete), with failures rendered as
    /// `[provider-error] <backend>: <category> - <message>`.
    pub async fn route(&self, request: &CompletionRequest) -> String {
        match self.complete(request).await {
            Ok(text) => text,
            Err(failure) => failure.to_string(),
        }
    }

    async fn call(
        &self,
        backend: Backend,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        let adapter = adapter_for(backend);
        let http = adapter.build_request(request, self.env.as_ref())?;

        // Hard deadline around the whole exchange, retries included.
        let send = self.transport.send(&http, self.timeout);
        let body = match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TransportError::Timeout {
                    url: display_url(&http.url),
                    timeout_secs: self.timeout.as_secs(),
                }
                .into())
            }
        };
        Ok(adapter.extract_text(body))
    }

    fn failure(
        &self,
        backend: &str,
        error: &ProviderError,
        request: &CompletionRequest,
    ) -> ProviderFailure {
        let options = &request.options;
        let extra: Vec<&str> = options.token_env.as_deref().into_iter().collect();
        let mut secrets = credential_values(self.env.as_ref(), &extra);
        secrets.extend(options.headers.values().cloned());

        debug!(
            backend = %backend,
            category = error.category(),
            error = %scrub(&error.to_string(), &secrets),
            "Completion failed"
        );
        ProviderFailure::new(backend, error, &secrets)
    }
}

/// One-shot routing against the process environment and the default
/// transport, with router settings from the config file.
pub async fn route(
    prompt: &str,
    backend: Option<&str>,
    model: Option<&str>,
    options: CompletionOptions,
) -> String {
    let config = load_config(None);
    let mut request = CompletionRequest::new(prompt).options(options);
    request.backend = backend.map(String::from);
    request.model = model.map(String::from);
    Router::from_config(&config.router).route(&request).await
}
