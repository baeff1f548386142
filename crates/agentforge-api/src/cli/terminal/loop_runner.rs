//! Command Center loop orchestration.
//!
//! Resolves the agent, opens a session, then reads input until Ctrl+D or
//! `/exit`. Shell input goes through `SessionEngine::submit`; the engine owns
//! the transcript and this loop only prints what is new.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use agentforge_core::session::SubmitOutcome;

use crate::state::{AppState, ConcreteSession};

use super::commands::{self, TerminalCommand};
use super::input::{InputEvent, TerminalInput};
use super::render::{LineRenderer, print_file, print_file_list};

fn print_banner(session: &ConcreteSession) {
    let details = session.details();
    println!();
    println!(
        "  {} {}",
        style("Command Center").bold().cyan(),
        style(format!("· {}", session.agent_name())).bold()
    );
    println!(
        "  {}",
        style(format!(
            "{} · {} files · /help for controls",
            details.bot_type,
            session.files().len()
        ))
        .dim()
    );
    println!();
}

fn execution_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("executing...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Handle a slash command. Returns `false` when the loop should end.
fn handle_command(session: &ConcreteSession, command: TerminalCommand) -> bool {
    match command {
        TerminalCommand::Help => commands::print_help(),
        TerminalCommand::Files => print_file_list(
            session.files(),
            session.active_file().map(|f| f.filename.as_str()),
        ),
        TerminalCommand::Open(name) => {
            let resolved = session.complete(&name);
            if session.select_file(&resolved) {
                if let Some(file) = session.active_file() {
                    print_file(file);
                }
            } else {
                println!("  {} No file named '{name}'.", style("!").yellow().bold());
            }
        }
        TerminalCommand::View => match session.active_file() {
            Some(file) => print_file(file),
            None => println!("  {}", style("No file selected.").dim()),
        },
        TerminalCommand::History => {
            let history = session.history();
            if history.is_empty() {
                println!("  {}", style("No commands yet.").dim());
            }
            for (i, entry) in history.iter().enumerate() {
                println!("  {} {entry}", style(format!("{:>3}", i + 1)).dim());
            }
        }
        TerminalCommand::Exit => return false,
        TerminalCommand::Unknown(cmd) => {
            println!(
                "  {} Unknown command: {cmd}. Type /help for controls.",
                style("!").yellow().bold()
            );
        }
    }
    true
}

/// Run the Command Center for the agent matching `query`.
pub async fn run_terminal(state: &AppState, query: &str) -> anyhow::Result<()> {
    let agent = crate::cli::agent::resolve_agent(state, query).await?;
    let session = state.open_session(&agent)?;
    info!(agent_id = %agent.id, "command center started");

    print_banner(&session);
    let mut renderer = LineRenderer::new();
    renderer.print_new(&session.lines());

    let prompt = format!("  {} ", style(format!("{} $", session.agent_name())).green().bold());
    let (mut input, _writer) = TerminalInput::new(prompt, state.config.session.history_capacity)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let line = match input.read_line().await {
            InputEvent::Line(line) => line,
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("Use /exit or Ctrl+D to leave.").dim());
                continue;
            }
        };

        if let Some(command) = commands::parse(&line) {
            if !handle_command(&session, command) {
                break;
            }
            continue;
        }

        let spinner = (!line.trim().is_empty()).then(execution_spinner);
        let outcome = session.submit(&line).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        debug!(?outcome, "input processed");

        match outcome {
            SubmitOutcome::Ignored => continue,
            SubmitOutcome::Busy => {
                println!("  {}", style("A command is still running.").yellow());
                continue;
            }
            SubmitOutcome::Cleared => {
                input.clear();
                renderer.reset();
            }
            SubmitOutcome::Builtin | SubmitOutcome::Executed | SubmitOutcome::Failed => {}
        }

        input.sync_history(&session.history());
        renderer.print_new(&session.lines());
    }

    println!("\n  {}", style("Session ended.").dim());
    info!(agent_id = %agent.id, "command center closed");
    Ok(())
}
