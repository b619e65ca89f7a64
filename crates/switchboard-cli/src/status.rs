//! `switchboard status` — configuration and credential status.
//!
//! Lists which variables are set, never their values.

use anyhow::Result;
use colored::Colorize;

use switchboard_core::config::{get_config_path, load_config};
use switchboard_core::utils::expand_home;
use switchboard_core::{Environment, ProcessEnvironment};
use switchboard_providers::{detect, BackendSpec, BACKENDS, PROVIDER_ENV};

/// Run the status command.
pub fn run() -> Result<()> {
    let env = ProcessEnvironment;
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "Switchboard Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        presence(config_path.exists())
    );

    let persona = expand_home(&config.advisor.persona_file);
    println!(
        "  {:<18} {} {}",
        "Persona:".bold(),
        persona.display(),
        presence(persona.exists())
    );

    println!(
        "  {:<18} {}s | retry on connect errors: {}",
        "Timeout:".bold(),
        config.router.timeout().as_secs(),
        config.router.retry_connect_errors
    );

    let override_status = match env.get_non_empty(PROVIDER_ENV) {
        Some(value) => value.trim().to_string(),
        None => "(unset)".dimmed().to_string(),
    };
    println!("  {:<18} {}", format!("{PROVIDER_ENV}:").bold(), override_status);
    println!("  {:<18} {}", "Auto-detected:".bold(), detect(&env));

    println!();
    println!("  {}", "Backends:".bold());
    for spec in BACKENDS {
        println!(
            "    {:<12} {:<24} {}",
            spec.backend.as_str(),
            spec.display_name,
            credential_status(spec, &env)
        );
    }
    println!();

    Ok(())
}

fn presence(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

/// One status cell for `spec`: which variable holds the credential, or
/// whether the backend runs without one.
fn credential_status(spec: &BackendSpec, env: &dyn Environment) -> String {
    if let Some(name) = spec.env_keys.iter().find(|k| env.get_non_empty(k).is_some()) {
        return format!("{} ({name} set)", "✓".green());
    }
    if !spec.credential_required {
        return format!("{}", "· no credential needed".dimmed());
    }
    format!("{}", "· not configured".dimmed())
}
