//! Command Center terminal lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a terminal line, which decides how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Echo of what the user typed.
    Input,
    /// Command output, built-in or from the execution backend.
    Output,
    /// Session notices (welcome banner).
    System,
    Error,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Input => write!(f, "input"),
            LineKind::Output => write!(f, "output"),
            LineKind::System => write!(f, "system"),
            LineKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLine {
    pub kind: LineKind,
    pub content: String,
}

impl TerminalLine {
    pub fn input(content: impl Into<String>) -> Self {
        Self::new(LineKind::Input, content)
    }

    pub fn output(content: impl Into<String>) -> Self {
        Self::new(LineKind::Output, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(LineKind::System, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(LineKind::Error, content)
    }

    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// Render the line as one turn of a transcript.
    ///
    /// Input lines are the user's turn, everything else is the agent's.
    pub fn as_transcript_turn(&self) -> String {
        match self.kind {
            LineKind::Input => format!("User: {}", self.content),
            _ => format!("Agent: {}", self.content),
        }
    }
}
