//! Configuration schema.
//!
//! Hierarchy: `Config` → `RouterConfig`, `AdvisorConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.
//!
//! Credentials are deliberately absent: they are only ever read from the
//! environment at call time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default transport timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;
/// Upper bound accepted for the transport timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.switchboard/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub router: RouterConfig,
    pub advisor: AdvisorConfig,
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

/// Settings for outbound completion calls.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    /// Per-call timeout in seconds. Clamped to `1..=MAX_TIMEOUT_SECS`.
    pub timeout_secs: u64,
    /// Retry once when the connection itself could not be established.
    pub retry_connect_errors: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_connect_errors: true,
        }
    }
}

impl RouterConfig {
    /// The effective (bounded) timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, MAX_TIMEOUT_SECS))
    }
}

// ─────────────────────────────────────────────
// Advisor
// ─────────────────────────────────────────────

/// Settings for the persona-prefixed advisor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorConfig {
    /// Path of the persona text file (`~` is expanded).
    pub persona_file: String,
    /// Sampling temperature sent with advisor prompts.
    pub temperature: f64,
    /// Maximum tokens requested for advisor replies.
    pub max_tokens: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            persona_file: "~/.switchboard/persona.txt".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }
}
