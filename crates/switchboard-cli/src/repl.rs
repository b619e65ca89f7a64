//! Interactive REPL for `switchboard ask`.
//!
//! Uses `rustyline` for readline-style editing with persistent history. Each
//! line is routed on its own; nothing is carried between prompts.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use switchboard_core::utils::get_data_path;
use switchboard_providers::{CompletionRequest, Router};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Run the interactive loop. `template` carries backend, model and options;
/// its prompt is replaced by each input line.
pub async fn run(router: &Router, template: &CompletionRequest) -> Result<()> {
    let label = match router.resolve_backend(template) {
        Ok(backend) => backend.to_string(),
        Err(_) => router.requested_backend(template),
    };
    helpers::print_banner(&label);

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_exit_command(trimmed) {
            println!("\nGoodbye!");
            break;
        }

        let _ = editor.add_history_entry(&input);

        debug!(chars = trimmed.chars().count(), "routing REPL prompt");
        helpers::print_thinking();
        let request = CompletionRequest {
            prompt: trimmed.to_string(),
            ..template.clone()
        };
        let reply = router.route(&request).await;
        helpers::clear_thinking();
        helpers::print_response(&reply);
        println!();
    }

    save_history(&mut editor);
    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

fn history_path() -> std::path::PathBuf {
    get_data_path().join("history").join("ask_history")
}

fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("explain exit codes"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".switchboard"));
        assert!(path.ends_with("history/ask_history"));
    }
}
