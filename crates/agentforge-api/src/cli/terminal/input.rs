//! Async readline input for the Command Center.
//!
//! Wraps `rustyline_async::Readline`. Lines are returned untrimmed: the
//! session engine records the raw input. Arrow-key recall mirrors the
//! engine's bounded history rather than keeping a list of its own.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    Line(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Async input handler wrapping rustyline_async.
pub struct TerminalInput {
    rl: Readline,
}

impl TerminalInput {
    /// Create the input handler and a `SharedWriter` for output that must not
    /// tear the prompt. Recall is capped at `history_capacity` entries.
    pub fn new(
        prompt: String,
        history_capacity: usize,
    ) -> Result<(Self, SharedWriter), ReadlineError> {
        let (mut rl, stdout) = Readline::new(prompt)?;
        rl.set_max_history(history_capacity);
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => InputEvent::Line(line),
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Replace arrow-key recall with the session's history (most recent first).
    pub fn sync_history(&mut self, newest_first: &[String]) {
        self.rl.set_history_entries(recall_entries(newest_first));
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}

/// Order session history the way readline expects it: oldest first.
pub fn recall_entries(newest_first: &[String]) -> Vec<String> {
    newest_first.iter().rev().cloned().collect()
}
