//! `switchboard init` — write the default config and a persona template.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use switchboard_core::config::{get_config_path, load_config, save_config};
use switchboard_core::utils::expand_home;

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "Switchboard — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None);
        save_config(&config, Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let config = load_config(None);
    let persona = expand_home(&config.advisor.persona_file);
    create_template(&persona, PERSONA_TEMPLATE)?;

    println!();
    println!(
        "{}",
        "  Setup complete! Export a backend credential and run `switchboard ask`.".green()
    );
    println!();

    Ok(())
}

/// Create a template file (and its parent directory) if it doesn't exist.
fn create_template(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("  {} {} already exists", "✓".green(), path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("  {} created {}", "✓".green(), path.display());
    Ok(())
}

const PERSONA_TEMPLATE: &str = "\
pragmatic senior engineer who answers with short, concrete steps
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_template_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("persona.txt");
        create_template(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn create_template_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.txt");
        std::fs::write(&path, "original").unwrap();
        create_template(&path, "new content").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn persona_template_is_one_line() {
        assert_eq!(PERSONA_TEMPLATE.trim().lines().count(), 1);
    }
}
