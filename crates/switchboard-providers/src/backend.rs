//! Backend identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// One external completion service family.
///
/// The discriminant doubles as the index into [`crate::registry::BACKENDS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    OpenAi,
    Azure,
    HuggingFace,
    Anthropic,
    Ollama,
    Vertex,
    Zhipu,
    Custom,
    HackLiberty,
    DeepSeek,
    Perplexity,
    Qai,
}

impl Backend {
    /// Every backend, in registry order.
    pub const ALL: [Backend; 12] = [
        Backend::OpenAi,
        Backend::Azure,
        Backend::HuggingFace,
        Backend::Anthropic,
        Backend::Ollama,
        Backend::Vertex,
        Backend::Zhipu,
        Backend::Custom,
        Backend::HackLiberty,
        Backend::DeepSeek,
        Backend::Perplexity,
        Backend::Qai,
    ];

    /// Canonical lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::OpenAi => "openai",
            Backend::Azure => "azure",
            Backend::HuggingFace => "huggingface",
            Backend::Anthropic => "anthropic",
            Backend::Ollama => "ollama",
            Backend::Vertex => "vertex",
            Backend::Zhipu => "zhipu",
            Backend::Custom => "custom",
            Backend::HackLiberty => "hackliberty",
            Backend::DeepSeek => "deepseek",
            Backend::Perplexity => "perplexity",
            Backend::Qai => "qai",
        }
    }

    /// Look up a backend by identifier or alias (case-insensitive).
    pub fn from_name(name: &str) -> Option<Backend> {
        let backend = match name.trim().to_lowercase().as_str() {
            "openai" => Backend::OpenAi,
            "azure" => Backend::Azure,
            "huggingface" | "hf" => Backend::HuggingFace,
            "anthropic" => Backend::Anthropic,
            "ollama" => Backend::Ollama,
            "vertex" | "google" | "gcp" => Backend::Vertex,
            "zhipu" | "glm" | "bigmodel" => Backend::Zhipu,
            "custom" => Backend::Custom,
            "hackliberty" => Backend::HackLiberty,
            "deepseek" => Backend::DeepSeek,
            "perplexity" => Backend::Perplexity,
            "qai" => Backend::Qai,
            _ => return None,
        };
        Some(backend)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::from_name(s).ok_or_else(|| ProviderError::UnknownBackend(s.trim().to_string()))
    }
}

/// What the caller asked for: a concrete backend or auto-detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Auto,
    Backend(Backend),
}

impl FromStr for Selection {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Selection::Auto)
        } else {
            s.parse().map(Selection::Backend)
        }
    }
}
