//! Persona-prefixed completions.
//!
//! The advisor reads a persona from a text file, wraps the task in a fixed
//! template and hands it to the [`Router`]. Router failures already arrive as
//! `[provider-error] …` text, so the advisor itself never fails.

use std::path::{Path, PathBuf};

use switchboard_core::config::{AdvisorConfig, Config};
use switchboard_core::utils::expand_home;
use tracing::debug;

use crate::router::Router;
use crate::traits::{CompletionOptions, CompletionRequest};

/// Persona used when the persona file is missing, unreadable or blank.
pub const DEFAULT_PERSONA: &str = "switchboard";

/// Build the advisor prompt for `persona` and `task`.
pub fn build_prompt(persona: &str, task: &str) -> String {
    format!("Persona: {persona}\n\nTask: {task}\n\nPlease reply with concise guidance.")
}

/// Read the persona text, falling back to [`DEFAULT_PERSONA`].
pub fn load_persona(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            debug!(path = %path.display(), "Persona file is empty, using default");
            DEFAULT_PERSONA.to_string()
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Persona file unavailable, using default");
            DEFAULT_PERSONA.to_string()
        }
    }
}

/// Persona wrapper around a [`Router`].
#[derive(Clone, Debug)]
pub struct Advisor {
    router: Router,
    persona_path: PathBuf,
    temperature: f64,
    max_tokens: u32,
}

impl Advisor {
    pub fn new(router: Router, config: &AdvisorConfig) -> Self {
        Self {
            router,
            persona_path: expand_home(&config.persona_file),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Router and advisor both built from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(Router::from_config(&config.router), &config.advisor)
    }

    pub fn persona_path(&self) -> &Path {
        &self.persona_path
    }

    /// Ask for guidance on `task`. Returns the trimmed reply or a
    /// `[provider-error]` line.
    pub async fn advise(&self, task: &str, backend: Option<&str>, model: Option<&str>) -> String {
        let persona = load_persona(&self.persona_path);
        let options = CompletionOptions::new()
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);
        let mut request = CompletionRequest::new(build_prompt(&persona, task)).options(options);
        request.backend = backend.map(String::from);
        request.model = model.map(String::from);

        self.router.route(&request).await.trim().to_string()
    }
}
