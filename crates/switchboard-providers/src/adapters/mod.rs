//! Backend adapters, one per provider family.
//!
//! [`adapter_for`] is the registry: an exhaustive `match` from [`Backend`] to
//! its adapter, so adding a backend without an adapter does not compile.

mod anthropic;
mod azure;
mod generic;
mod huggingface;
mod ollama;
mod openai;
mod vertex;
mod zhipu;

pub use anthropic::AnthropicAdapter;
pub use azure::AzureAdapter;
pub use generic::GenericAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;
pub use vertex::VertexAdapter;
pub use zhipu::ZhipuAdapter;

use serde_json::{json, Value};

use crate::backend::Backend;
use crate::traits::Adapter;

/// The adapter implementing `backend`'s dialect.
pub fn adapter_for(backend: Backend) -> &'static dyn Adapter {
    match backend {
        Backend::OpenAi => &OpenAiAdapter,
        Backend::Azure => &AzureAdapter,
        Backend::HuggingFace => &HuggingFaceAdapter,
        Backend::Anthropic => &AnthropicAdapter,
        Backend::Ollama => &OllamaAdapter,
        Backend::Vertex => &VertexAdapter,
        Backend::Zhipu => &ZhipuAdapter,
        Backend::Custom => &GenericAdapter::CUSTOM,
        Backend::HackLiberty => &GenericAdapter::HACKLIBERTY,
        Backend::DeepSeek => &GenericAdapter::DEEPSEEK,
        Backend::Perplexity => &GenericAdapter::PERPLEXITY,
        Backend::Qai => &GenericAdapter::QAI,
    }
}

/// Chat-style message list. The system message is omitted when empty.
pub(crate) fn chat_messages(system: &str, prompt: &str) -> Value {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(json!({"role": "system", "content": system}));
    }
    messages.push(json!({"role": "user", "content": prompt}));
    Value::Array(messages)
}

/// JSON pointer to the first chat choice's content.
pub(crate) const CHAT_CONTENT: &str = "/choices/0/message/content";
