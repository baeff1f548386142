//! Commands the session resolves without the execution backend.

use agentforge_types::project::{GeneratedFile, find_file};
use agentforge_types::terminal::TerminalLine;

pub const HELP_TEXT: &str = "Available commands:
  help            - Show this help message
  ls              - List project files
  cat <filename>  - Show the contents of a file
  run             - Activate the agent and start a conversation
  exit            - Leave agent mode
  clear           - Clear the terminal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin<'a> {
    Help,
    Ls,
    Cat(Option<&'a str>),
    Clear,
}

impl<'a> Builtin<'a> {
    /// Recognize a built-in by its command word (case-insensitive).
    pub fn parse(command: &'a str) -> Option<Self> {
        let command = command.trim();
        let (word, rest) = match command.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (command, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "help" => Some(Builtin::Help),
            "ls" => Some(Builtin::Ls),
            "cat" => Some(Builtin::Cat((!rest.is_empty()).then_some(rest))),
            "clear" => Some(Builtin::Clear),
            _ => None,
        }
    }

    /// The line a non-clearing built-in prints. `None` for `clear`.
    pub fn render(&self, files: &[GeneratedFile]) -> Option<TerminalLine> {
        match self {
            Builtin::Help => Some(TerminalLine::output(HELP_TEXT)),
            Builtin::Ls => Some(TerminalLine::output(list_files(files))),
            Builtin::Cat(None) => Some(TerminalLine::error(
                "Error: specify a filename. Usage: cat <filename>",
            )),
            Builtin::Cat(Some(name)) => Some(match find_file(files, name) {
                Some(file) => TerminalLine::output(format!(
                    "--- Contents of {} ---\n{}",
                    file.filename, file.content
                )),
                None => TerminalLine::output(format!("Error: file '{name}' not found.")),
            }),
            Builtin::Clear => None,
        }
    }
}

/// Filenames in project order, separated by three spaces.
pub fn list_files(files: &[GeneratedFile]) -> String {
    files
        .iter()
        .map(|f| f.filename.as_str())
        .collect::<Vec<_>>()
        .join("   ")
}
