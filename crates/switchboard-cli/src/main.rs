//! Switchboard CLI — entry point.
//!
//! # Commands
//!
//! - `switchboard ask [PROMPT]` — route one prompt (or open a REPL)
//! - `switchboard advise TASK` — persona-prefixed prompt
//! - `switchboard status` — configuration and credential status
//! - `switchboard init` — write default config and persona template

mod helpers;
mod init;
mod repl;
mod status;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use switchboard_core::config::load_config;
use switchboard_providers::{Advisor, CompletionOptions, CompletionRequest, Router};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Switchboard — one prompt, many text-completion backends
#[derive(Parser)]
#[command(name = "switchboard", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a prompt to a backend (single-shot or interactive REPL)
    Ask {
        /// Prompt text. Omit for REPL mode.
        prompt: Option<String>,

        #[command(flatten)]
        target: Target,

        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Maximum tokens to generate
        #[arg(long)]
        max_tokens: Option<u32>,

        /// System preamble
        #[arg(short, long)]
        system: Option<String>,

        /// Extra option as key=value (repeatable; value parsed as JSON when possible)
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Ask for guidance with the configured persona
    Advise {
        /// Task description
        task: String,

        #[command(flatten)]
        target: Target,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and credential status
    Status,

    /// Write default configuration and persona template
    Init,
}

/// Backend and model selection shared by `ask` and `advise`.
#[derive(Args, Clone, Debug, Default)]
struct Target {
    /// Backend identifier (`auto`, `openai`, `hf`, …)
    #[arg(short, long)]
    backend: Option<String>,

    /// Backend-specific model name
    #[arg(short, long)]
    model: Option<String>,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            prompt,
            target,
            temperature,
            max_tokens,
            system,
            options,
            logs,
        } => {
            init_logging(logs);
            let mut completion = helpers::parse_options(&options)?;
            completion.temperature = temperature.or(completion.temperature);
            completion.max_tokens = max_tokens.or(completion.max_tokens);
            completion.system = system.or(completion.system);
            run_ask(prompt, target, completion).await
        }
        Commands::Advise { task, target, logs } => {
            init_logging(logs);
            run_advise(&task, &target).await
        }
        Commands::Status => status::run(),
        Commands::Init => init::run(),
    }
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

async fn run_ask(prompt: Option<String>, target: Target, options: CompletionOptions) -> Result<()> {
    let config = load_config(None);
    let router = Router::from_config(&config.router);

    let mut template = CompletionRequest::new("").options(options);
    template.backend = target.backend;
    template.model = target.model;

    match prompt {
        Some(prompt) => {
            info!("routing single prompt");
            let request = CompletionRequest {
                prompt,
                ..template
            };
            let reply = router.route(&request).await;
            helpers::print_response(&reply);
        }
        None => {
            repl::run(&router, &template)
                .await
                .context("interactive session failed")?;
        }
    }

    Ok(())
}

async fn run_advise(task: &str, target: &Target) -> Result<()> {
    let config = load_config(None);
    let advisor = Advisor::from_config(&config);
    info!(persona = %advisor.persona_path().display(), "advising");

    let reply = advisor
        .advise(task, target.backend.as_deref(), target.model.as_deref())
        .await;
    helpers::print_response(&reply);
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("switchboard=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_flags() {
        let cli = Cli::try_parse_from([
            "switchboard", "ask", "hello", "-b", "hf", "-m", "gpt2", "-t", "0.4",
            "--max-tokens", "64", "-o", "top_k=5", "-o", "stop=\"\\n\"",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                prompt,
                target,
                temperature,
                max_tokens,
                options,
                ..
            } => {
                assert_eq!(prompt.as_deref(), Some("hello"));
                assert_eq!(target.backend.as_deref(), Some("hf"));
                assert_eq!(target.model.as_deref(), Some("gpt2"));
                assert_eq!(temperature, Some(0.4));
                assert_eq!(max_tokens, Some(64));
                assert_eq!(options.len(), 2);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_ask_without_prompt() {
        let cli = Cli::try_parse_from(["switchboard", "ask"]).unwrap();
        assert!(matches!(cli.command, Commands::Ask { prompt: None, .. }));
    }

    #[test]
    fn test_parse_advise_requires_task() {
        assert!(Cli::try_parse_from(["switchboard", "advise"]).is_err());
        let cli = Cli::try_parse_from(["switchboard", "advise", "plan the release"]).unwrap();
        assert!(matches!(cli.command, Commands::Advise { .. }));
    }
}
