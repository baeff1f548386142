//! ExecutionBackend trait definition (port).

use agentforge_types::error::ExecutionError;
use agentforge_types::order::OrderDetails;
use agentforge_types::project::GeneratedFile;
use agentforge_types::terminal::TerminalLine;

/// Literal a backend answers with to ask for a full terminal reset.
pub const CLEAR_SENTINEL: &str = "CLEAR_TERMINAL";

/// What a backend produced for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutput {
    Stdout(String),
    /// Reset the terminal buffer, same as the `clear` built-in.
    ClearTerminal,
}

impl ExecutionOutput {
    /// Interpret raw backend text, recognizing the clear sentinel.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim() == CLEAR_SENTINEL {
            ExecutionOutput::ClearTerminal
        } else {
            ExecutionOutput::Stdout(raw)
        }
    }
}

/// One command plus the session context it runs in.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequest<'a> {
    pub command: &'a str,
    pub files: &'a [GeneratedFile],
    pub details: &'a OrderDetails,
    /// Trailing terminal lines, oldest first, ending with the command's echo.
    pub context_tail: &'a [TerminalLine],
}

/// External collaborator that simulates running a command against a project.
///
/// Implementations live in agentforge-infra (e.g., `LlmExecutionBackend`).
pub trait ExecutionBackend: Send + Sync {
    fn run(
        &self,
        request: &ExecutionRequest<'_>,
    ) -> impl std::future::Future<Output = Result<ExecutionOutput, ExecutionError>> + Send;
}
