//! Shared CLI helpers — option parsing, response printing, banner.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::Value;

use switchboard_providers::{CompletionOptions, FAILURE_TAG};

/// Parse `key=value` pairs into completion options.
///
/// Values are read as JSON when they parse (`0.2`, `true`, `"text"`,
/// `{"a":1}`), otherwise kept as plain strings.
pub fn parse_options(pairs: &[String]) -> Result<CompletionOptions> {
    let mut options = CompletionOptions::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("option '{pair}' must look like key=value");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("option '{pair}' has an empty key");
        }
        if let Some(name) = key.strip_prefix("header.") {
            options.headers.insert(name.to_string(), raw.to_string());
            continue;
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        options
            .insert(key, value)
            .with_context(|| format!("invalid option '{key}'"))?;
    }
    Ok(options)
}

/// Print a routed reply to stdout. Failures go to stderr.
pub fn print_response(response: &str) {
    if response.starts_with(FAILURE_TAG) {
        eprintln!("{}", response.red());
    } else if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner(backend: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}  {}",
        "Switchboard".cyan().bold(),
        version.dimmed(),
        format!("backend: {backend}").dimmed()
    );
    println!("{}", "Type a prompt, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
