//! Backend registry — static credential bindings and endpoint defaults.
//!
//! Each `BackendSpec` describes where one backend's secret, endpoint and
//! model name come from. The table is read-only and indexed by the
//! [`Backend`] discriminant.

use switchboard_core::Environment;

use crate::backend::Backend;
use crate::error::ProviderError;

// ─────────────────────────────────────────────
// BackendSpec — static metadata for one backend
// ─────────────────────────────────────────────

/// Static specification describing one backend.
#[derive(Clone, Debug)]
pub struct BackendSpec {
    /// The backend this entry belongs to.
    pub backend: Backend,
    /// Human-readable name for status output.
    pub display_name: &'static str,
    /// Env vars that may hold the credential, in priority order.
    pub env_keys: &'static [&'static str],
    /// Whether the call must fail fast when no credential is set.
    pub credential_required: bool,
    /// Extra env vars that only count for auto-detection (e.g. `OLLAMA_HOST`).
    pub detect_keys: &'static [&'static str],
    /// Env vars that override the endpoint, in priority order.
    pub endpoint_keys: &'static [&'static str],
    /// Endpoint used when neither an option nor an env var overrides it.
    pub default_endpoint: Option<&'static str>,
    /// Env var that overrides the default model.
    pub model_key: Option<&'static str>,
    /// Model used when neither the caller nor the env picks one.
    pub default_model: Option<&'static str>,
    /// `max_tokens` sent when the caller doesn't set one.
    pub default_max_tokens: u32,
}

impl BackendSpec {
    /// First non-empty credential value, if any.
    pub fn credential(&self, env: &dyn Environment) -> Option<String> {
        env.first_non_empty(self.env_keys)
    }

    /// Credential value, or a config error naming the variables.
    pub fn require_credential(&self, env: &dyn Environment) -> Result<String, ProviderError> {
        self.credential(env)
            .ok_or_else(|| ProviderError::missing_credential(self))
    }

    /// Whether any bound variable (credential or detection-only) is set.
    pub fn is_detected(&self, env: &dyn Environment) -> bool {
        self.credential(env).is_some() || env.first_non_empty(self.detect_keys).is_some()
    }

    /// Resolve the endpoint: per-call override > env vars > default.
    pub fn endpoint(&self, override_url: Option<&str>, env: &dyn Environment) -> Option<String> {
        override_url
            .filter(|u| !u.trim().is_empty())
            .map(String::from)
            .or_else(|| env.first_non_empty(self.endpoint_keys))
            .or_else(|| self.default_endpoint.map(String::from))
    }

    /// Endpoint, or a config error naming the variables.
    pub fn require_endpoint(
        &self,
        override_url: Option<&str>,
        env: &dyn Environment,
    ) -> Result<String, ProviderError> {
        self.endpoint(override_url, env)
            .ok_or_else(|| ProviderError::missing_endpoint(self))
    }

    /// Resolve the model: explicit > env var > default.
    pub fn model(&self, explicit: Option<&str>, env: &dyn Environment) -> Option<String> {
        explicit
            .filter(|m| !m.trim().is_empty())
            .map(String::from)
            .or_else(|| self.model_key.and_then(|k| env.get_non_empty(k)))
            .or_else(|| self.default_model.map(String::from))
    }
}

// ─────────────────────────────────────────────
// All 12 backends (indexed by `Backend as usize`)
// ─────────────────────────────────────────────

/// Complete list of backend specifications.
pub static BACKENDS: &[BackendSpec] = &[
    BackendSpec {
        backend: Backend::OpenAi,
        display_name: "OpenAI",
        env_keys: &["OPENAI_API_KEY"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["OPENAI_ENDPOINT"],
        default_endpoint: Some("https://api.openai.com/v1/chat/completions"),
        model_key: Some("OPENAI_MODEL"),
        default_model: Some("gpt-4o-mini"),
        default_max_tokens: 1024,
    },
    // Deployment-style: the URL is templated from resource + deployment.
    BackendSpec {
        backend: Backend::Azure,
        display_name: "Azure OpenAI",
        env_keys: &["AZURE_OPENAI_KEY", "AZURE_API_KEY"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["AZURE_OPENAI_ENDPOINT"],
        default_endpoint: None,
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
    BackendSpec {
        backend: Backend::HuggingFace,
        display_name: "Hugging Face Inference",
        env_keys: &["HUGGINGFACE_API_KEY", "HF_TOKEN"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["HF_INFERENCE_ENDPOINT"],
        default_endpoint: Some("https://api-inference.huggingface.co"),
        model_key: Some("HF_MODEL"),
        default_model: Some("gpt2"),
        default_max_tokens: 512,
    },
    BackendSpec {
        backend: Backend::Anthropic,
        display_name: "Anthropic",
        env_keys: &["ANTHROPIC_API_KEY", "ANTHROPIC_KEY"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["ANTHROPIC_ENDPOINT"],
        default_endpoint: Some("https://api.anthropic.com/v1/complete"),
        model_key: Some("ANTHROPIC_MODEL"),
        default_model: Some("claude-2.1"),
        default_max_tokens: 512,
    },
    // Local: a host alone is enough to be detected; the key is optional.
    BackendSpec {
        backend: Backend::Ollama,
        display_name: "Ollama",
        env_keys: &["OLLAMA_API_KEY"],
        credential_required: false,
        detect_keys: &["OLLAMA_HOST"],
        endpoint_keys: &["OLLAMA_HOST"],
        default_endpoint: Some("http://localhost:11434"),
        model_key: Some("OLLAMA_MODEL"),
        default_model: Some("llama3"),
        default_max_tokens: 512,
    },
    // Token-endpoint: short-lived token + caller-supplied full URL.
    BackendSpec {
        backend: Backend::Vertex,
        display_name: "Google Vertex AI",
        env_keys: &["GOOGLE_OAUTH_ACCESS_TOKEN", "GCP_ACCESS_TOKEN"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["GEMINI_API_ENDPOINT", "VERTEX_MODEL_ENDPOINT"],
        default_endpoint: None,
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
    BackendSpec {
        backend: Backend::Zhipu,
        display_name: "Zhipu GLM",
        env_keys: &["ZHIPU_API_KEY", "BIGMODEL_KEY"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["ZHIPU_ENDPOINT"],
        default_endpoint: Some("https://api.zhipu.ai/endpoint"),
        model_key: Some("ZHIPU_MODEL"),
        default_model: Some("glm-4"),
        default_max_tokens: 1024,
    },
    // Generic: the token variable name itself can be overridden per call.
    BackendSpec {
        backend: Backend::Custom,
        display_name: "Custom endpoint",
        env_keys: &["PROVIDER_CUSTOM_KEY"],
        credential_required: false,
        detect_keys: &[],
        endpoint_keys: &["PROVIDER_CUSTOM_URL"],
        default_endpoint: None,
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
    BackendSpec {
        backend: Backend::HackLiberty,
        display_name: "HackLiberty",
        env_keys: &["HACKLIBERTY_KEY"],
        credential_required: false,
        detect_keys: &[],
        endpoint_keys: &["HACKLIBERTY_ENDPOINT"],
        default_endpoint: Some("https://api.hackliberty.org/generate"),
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
    BackendSpec {
        backend: Backend::DeepSeek,
        display_name: "DeepSeek",
        env_keys: &["DEEPSEEK_KEY"],
        credential_required: false,
        detect_keys: &[],
        endpoint_keys: &["DEEPSEEK_ENDPOINT"],
        default_endpoint: Some("https://api.deepseek.ai/generate"),
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
    BackendSpec {
        backend: Backend::Perplexity,
        display_name: "Perplexity",
        env_keys: &["PERPLEXITY_KEY"],
        credential_required: false,
        detect_keys: &[],
        endpoint_keys: &["PERPLEXITY_ENDPOINT"],
        default_endpoint: Some("https://api.perplexity.ai/generate"),
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
    BackendSpec {
        backend: Backend::Qai,
        display_name: "Qualcomm AI",
        env_keys: &["QAI_TOKEN", "QUALCOMM_QAI_KEY"],
        credential_required: true,
        detect_keys: &[],
        endpoint_keys: &["QAI_ENDPOINT"],
        default_endpoint: Some("https://api.qualcomm.ai/generate"),
        model_key: None,
        default_model: None,
        default_max_tokens: 1024,
    },
];

/// Auto-detection precedence: local first, then hosted tiers.
pub static DETECTION_ORDER: &[Backend] = &[
    Backend::Ollama,
    Backend::OpenAi,
    Backend::HuggingFace,
    Backend::Anthropic,
    Backend::Azure,
    Backend::Vertex,
    Backend::Zhipu,
    Backend::Qai,
];

/// Env var naming which variable holds the custom backend's token.
pub const CUSTOM_KEY_NAME_ENV: &str = "PROVIDER_CUSTOM_KEY_NAME";

impl Backend {
    /// The static spec for this backend.
    pub fn spec(self) -> &'static BackendSpec {
        &BACKENDS[self as usize]
    }
}

/// Every credential value currently visible in `env`, plus the value of any
/// extra variable names given. Used to scrub failure messages.
pub fn credential_values(env: &dyn Environment, extra_names: &[&str]) -> Vec<String> {
    let mut values: Vec<String> = BACKENDS
        .iter()
        .flat_map(|spec| spec.env_keys.iter())
        .chain(extra_names.iter())
        .filter_map(|name| env.get_non_empty(name))
        .collect();
    if let Some(name) = env.get_non_empty(CUSTOM_KEY_NAME_ENV) {
        if let Some(value) = env.get_non_empty(name.trim()) {
            values.push(value);
        }
    }
    values.sort();
    values.dedup();
    values
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::MapEnvironment;

    #[test]
    fn test_table_matches_enum_order() {
        assert_eq!(BACKENDS.len(), Backend::ALL.len());
        for backend in Backend::ALL {
            assert_eq!(backend.spec().backend, backend);
        }
    }

    #[test]
    fn test_every_backend_has_a_credential_binding() {
        for spec in BACKENDS {
            assert!(!spec.env_keys.is_empty(), "{} has no env keys", spec.backend);
        }
    }

    #[test]
    fn test_generic_vendor_keys_are_optional() {
        for backend in [Backend::HackLiberty, Backend::DeepSeek, Backend::Perplexity] {
            assert!(!backend.spec().credential_required, "{backend}");
        }
        assert!(Backend::Qai.spec().credential_required);
    }

    #[test]
    fn test_credential_first_non_empty_wins() {
        let env = MapEnvironment::new()
            .set("AZURE_OPENAI_KEY", "")
            .set("AZURE_API_KEY", "az-2");
        assert_eq!(Backend::Azure.spec().credential(&env).as_deref(), Some("az-2"));
    }

    #[test]
    fn test_require_credential_error() {
        let err = Backend::OpenAi
            .spec()
            .require_credential(&MapEnvironment::new())
            .unwrap_err();
        assert_eq!(err.category(), "ConfigError");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_ollama_detected_by_host_alone() {
        let env = MapEnvironment::new().set("OLLAMA_HOST", "http://10.0.0.2:11434");
        let spec = Backend::Ollama.spec();
        assert!(spec.is_detected(&env));
        assert!(spec.credential(&env).is_none());
    }

    #[test]
    fn test_endpoint_precedence() {
        let spec = Backend::Zhipu.spec();
        let env = MapEnvironment::new().set("ZHIPU_ENDPOINT", "https://env.example/zhipu");

        assert_eq!(
            spec.endpoint(Some("https://call.example"), &env).as_deref(),
            Some("https://call.example")
        );
        assert_eq!(
            spec.endpoint(None, &env).as_deref(),
            Some("https://env.example/zhipu")
        );
        assert_eq!(
            spec.endpoint(None, &MapEnvironment::new()).as_deref(),
            Some("https://api.zhipu.ai/endpoint")
        );
    }

    #[test]
    fn test_vertex_has_no_default_endpoint() {
        let spec = Backend::Vertex.spec();
        assert!(spec.endpoint(None, &MapEnvironment::new()).is_none());
        let env = MapEnvironment::new().set("VERTEX_MODEL_ENDPOINT", "https://v.example/predict");
        assert_eq!(
            spec.endpoint(None, &env).as_deref(),
            Some("https://v.example/predict")
        );
    }

    #[test]
    fn test_model_precedence() {
        let spec = Backend::OpenAi.spec();
        let env = MapEnvironment::new().set("OPENAI_MODEL", "gpt-env");
        assert_eq!(spec.model(Some("gpt-arg"), &env).as_deref(), Some("gpt-arg"));
        assert_eq!(spec.model(None, &env).as_deref(), Some("gpt-env"));
        assert_eq!(
            spec.model(None, &MapEnvironment::new()).as_deref(),
            Some("gpt-4o-mini")
        );
    }

    #[test]
    fn test_detection_order_is_fixed() {
        assert_eq!(
            DETECTION_ORDER,
            &[
                Backend::Ollama,
                Backend::OpenAi,
                Backend::HuggingFace,
                Backend::Anthropic,
                Backend::Azure,
                Backend::Vertex,
                Backend::Zhipu,
                Backend::Qai,
            ]
        );
    }

    #[test]
    fn test_credential_values_collects_and_dedups() {
        let env = MapEnvironment::new()
            .set("OPENAI_API_KEY", "sk-1")
            .set("HF_TOKEN", "hf-1")
            .set("PROVIDER_CUSTOM_KEY_NAME", "MY_TOKEN")
            .set("MY_TOKEN", "mine")
            .set("OTHER", "sk-1");
        let values = credential_values(&env, &["OTHER"]);
        assert_eq!(values, vec!["hf-1", "mine", "sk-1"]);
    }
}
