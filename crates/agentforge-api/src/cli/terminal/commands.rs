//! Slash commands for the Command Center loop.
//!
//! These stay in the CLI: they control the viewer around the session and
//! never reach the session engine or its backend.

use console::style;

/// Available slash commands in the Command Center.
#[derive(Debug, PartialEq)]
pub enum TerminalCommand {
    Help,
    /// List project files, marking the one in the viewer.
    Files,
    /// Point the viewer at a file (prefix completion applies).
    Open(String),
    /// Print the file currently in the viewer.
    View,
    /// Show the session's input history, most recent first.
    History,
    Exit,
    /// Unknown command or missing argument.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<TerminalCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(TerminalCommand::Help),
        "/files" | "/f" => Some(TerminalCommand::Files),
        "/open" | "/o" => {
            if arg.is_empty() {
                Some(TerminalCommand::Unknown("/open requires a filename".to_string()))
            } else {
                Some(TerminalCommand::Open(arg.to_string()))
            }
        }
        "/view" | "/v" => Some(TerminalCommand::View),
        "/history" => Some(TerminalCommand::History),
        "/exit" | "/quit" | "/q" => Some(TerminalCommand::Exit),
        other => Some(TerminalCommand::Unknown(other.to_string())),
    }
}

/// Command Center help, slash commands first.
///
/// Filename completion only happens inside `/open`; the prompt itself has no
/// completion key.
pub fn help_text() -> String {
    let rows = [
        ("/files", "List project files"),
        ("/open <file>", "Show a file in the viewer (a filename prefix is completed)"),
        ("/view", "Print the file in the viewer"),
        ("/history", "Show recent commands"),
        ("/exit", "Leave the Command Center"),
    ];

    let mut text = format!("\n  {}\n\n", style("Command Center:").bold());
    for (cmd, desc) in rows {
        text.push_str(&format!("  {}  {desc}\n", style(format!("{cmd:<12}")).cyan()));
    }
    text.push('\n');
    let shell = "Anything else runs in the agent's environment. Type 'help' for shell commands.";
    text.push_str(&format!("  {}\n", style(shell).dim()));
    text.push_str(&format!("  {}\n", style("Up/Down recall recent commands, Ctrl+D to exit").dim()));
    text
}

pub fn print_help() {
    println!("{}", help_text());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        assert_eq!(
            parse("/open agent"),
            Some(TerminalCommand::Open("agent".to_string()))
        );
        assert_eq!(
            parse("/o   main.py  "),
            Some(TerminalCommand::Open("main.py".to_string()))
        );
        assert_eq!(
            parse("/open"),
            Some(TerminalCommand::Unknown("/open requires a filename".to_string()))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/HELP"), Some(TerminalCommand::Help));
        assert_eq!(parse("/files"), Some(TerminalCommand::Files));
        assert_eq!(parse("/view"), Some(TerminalCommand::View));
        assert_eq!(parse("/history"), Some(TerminalCommand::History));
        assert_eq!(parse("/q"), Some(TerminalCommand::Exit));
    }

    #[test]
    fn test_shell_input_is_not_a_command() {
        assert_eq!(parse("cat main.py"), None);
        assert_eq!(parse("help"), None);
    }

    #[test]
    fn test_help_places_completion_under_open() {
        console::set_colors_enabled(false);
        let help = help_text();
        let open_line = help.lines().find(|l| l.contains("/open")).unwrap();
        assert!(open_line.contains("prefix is completed"));
        assert!(!help.to_lowercase().contains("tab"));
        for cmd in ["/files", "/view", "/history", "/exit"] {
            assert!(help.contains(cmd), "{cmd} missing from help");
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(TerminalCommand::Unknown("/foo".to_string())));
    }
}
