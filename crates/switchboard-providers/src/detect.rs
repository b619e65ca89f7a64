//! Backend auto-detection from the environment.

use switchboard_core::Environment;
use tracing::debug;

use crate::backend::Backend;
use crate::registry::DETECTION_ORDER;

/// Pick a backend from whichever credentials are present.
///
/// Walks [`DETECTION_ORDER`] and returns the first backend with any
/// non-empty bound variable. Falls back to `custom` when
/// `PROVIDER_CUSTOM_URL` is set, then to `openai` when its key is set, and
/// finally to `ollama`. Total and deterministic for a given environment.
pub fn detect(env: &dyn Environment) -> Backend {
    if let Some(backend) = DETECTION_ORDER
        .iter()
        .copied()
        .find(|b| b.spec().is_detected(env))
    {
        debug!(backend = %backend, "Auto-detected backend");
        return backend;
    }

    let fallback = if Backend::Custom.spec().endpoint(None, env).is_some() {
        Backend::Custom
    } else if Backend::OpenAi.spec().credential(env).is_some() {
        Backend::OpenAi
    } else {
        Backend::Ollama
    };
    debug!(backend = %fallback, "No detectable credentials, using fallback backend");
    fallback
}
