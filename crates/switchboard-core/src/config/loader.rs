//! Config loader — reads `~/.switchboard/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.switchboard/config.json`
//! 3. Environment variables `SWITCHBOARD_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;
use crate::env::{Environment, ProcessEnvironment};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + process env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    load_config_with_env(path, &ProcessEnvironment)
}

/// Load configuration, reading overrides from the given environment.
pub fn load_config_with_env(path: Option<&Path>, env: &dyn Environment) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path), env)
}

/// Load config from a specific file path (no env overrides).
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `SWITCHBOARD_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `SWITCHBOARD_ROUTER__TIMEOUT_SECS` → `router.timeout_secs`
/// - `SWITCHBOARD_ROUTER__RETRY_CONNECT_ERRORS` → `router.retry_connect_errors`
/// - `SWITCHBOARD_ADVISOR__PERSONA_FILE` → `advisor.persona_file`
/// - `SWITCHBOARD_ADVISOR__TEMPERATURE` → `advisor.temperature`
/// - `SWITCHBOARD_ADVISOR__MAX_TOKENS` → `advisor.max_tokens`
///
/// Unparseable values are ignored with a warning.
fn apply_env_overrides(mut config: Config, env: &dyn Environment) -> Config {
    if let Some(val) = env.get_non_empty("SWITCHBOARD_ROUTER__TIMEOUT_SECS") {
        match val.trim().parse::<u64>() {
            Ok(n) => config.router.timeout_secs = n,
            Err(_) => warn!("Ignoring invalid SWITCHBOARD_ROUTER__TIMEOUT_SECS={}", val),
        }
    }
    if let Some(val) = env.get_non_empty("SWITCHBOARD_ROUTER__RETRY_CONNECT_ERRORS") {
        let val = val.trim().to_lowercase();
        config.router.retry_connect_errors = val == "true" || val == "1";
    }

    if let Some(val) = env.get_non_empty("SWITCHBOARD_ADVISOR__PERSONA_FILE") {
        config.advisor.persona_file = val;
    }
    if let Some(val) = env.get_non_empty("SWITCHBOARD_ADVISOR__TEMPERATURE") {
        match val.trim().parse::<f64>() {
            Ok(t) => config.advisor.temperature = t,
            Err(_) => warn!("Ignoring invalid SWITCHBOARD_ADVISOR__TEMPERATURE={}", val),
        }
    }
    if let Some(val) = env.get_non_empty("SWITCHBOARD_ADVISOR__MAX_TOKENS") {
        match val.trim().parse::<u32>() {
            Ok(n) => config.advisor.max_tokens = n,
            Err(_) => warn!("Ignoring invalid SWITCHBOARD_ADVISOR__MAX_TOKENS={}", val),
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
