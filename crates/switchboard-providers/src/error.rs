//! Error taxonomy for adapters and the router.
//!
//! - [`TransportError`] — what the HTTP layer can report.
//! - [`ProviderError`] — what an adapter call can fail with.
//! - [`ProviderFailure`] — the flattened, secret-free form handed to callers.

use std::fmt;

use switchboard_core::utils::{single_line, truncate_string};

use crate::registry::BackendSpec;

/// Maximum number of characters of error text exposed to callers.
pub const MAX_MESSAGE_CHARS: usize = 200;

/// Maximum number of characters of the backend identifier in a failure.
pub const MAX_BACKEND_CHARS: usize = 64;

/// Prefix every rendered failure starts with.
pub const FAILURE_TAG: &str = "[provider-error]";

/// Failures raised by the transport layer.
///
/// URLs are stored without their query string.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    /// Whether this failure is worth one more attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Connect { .. })
    }
}

/// Failures raised while preparing or performing one adapter call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Required credential, endpoint or option missing. Raised before any
    /// network call.
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unknown backend '{0}'")]
    UnknownBackend(String),
}

impl ProviderError {
    /// Category name used in the rendered failure line.
    pub fn category(&self) -> &'static str {
        match self {
            ProviderError::Config(_) => "ConfigError",
            ProviderError::Transport(_) => "TransportError",
            ProviderError::UnknownBackend(_) => "UnknownBackend",
        }
    }

    /// Missing credential for `spec`. Names the variables, never values.
    pub fn missing_credential(spec: &BackendSpec) -> Self {
        ProviderError::Config(format!(
            "{} not set for {} adapter",
            spec.env_keys.join(" or "),
            spec.backend
        ))
    }

    /// Missing endpoint for `spec`.
    pub fn missing_endpoint(spec: &BackendSpec) -> Self {
        let hint = if spec.endpoint_keys.is_empty() {
            "the `endpoint` option".to_string()
        } else {
            spec.endpoint_keys.join(" or ")
        };
        ProviderError::Config(format!("set {} for {} calls", hint, spec.backend))
    }
}

/// A categorized, secret-free adapter failure.
///
/// Rendered with [`fmt::Display`] as
/// `[provider-error] <backend>: <category> - <message>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderFailure {
    /// The backend identifier the call was resolved to (or the unknown name).
    pub backend: String,
    /// One of `ConfigError`, `TransportError`, `UnknownBackend`.
    pub category: &'static str,
    /// Single-line message, at most [`MAX_MESSAGE_CHARS`] characters.
    pub message: String,
}

impl ProviderFailure {
    /// Build a failure from an error, scrubbing every value in `secrets`.
    pub fn new(backend: &str, error: &ProviderError, secrets: &[String]) -> Self {
        let message = scrub(&error.to_string(), secrets);
        Self {
            backend: truncate_string(&single_line(&scrub(backend, secrets)), MAX_BACKEND_CHARS),
            category: error.category(),
            message: truncate_string(&single_line(&message), MAX_MESSAGE_CHARS),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} - {}",
            FAILURE_TAG, self.backend, self.category, self.message
        )
    }
}

impl std::error::Error for ProviderFailure {}

/// Replace every occurrence of each secret with `***`.
pub fn scrub(text: &str, secrets: &[String]) -> String {
    secrets
        .iter()
        .filter(|s| !s.is_empty())
        .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), "***"))
}

/// Strip the query string so tokens passed as URL parameters never surface.
pub(crate) fn display_url(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}
