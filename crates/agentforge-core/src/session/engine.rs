//! The session engine behind one Command Center terminal.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use agentforge_types::agent::Agent;
use agentforge_types::config::SessionSettings;
use agentforge_types::order::OrderDetails;
use agentforge_types::project::{CORE_LOGIC_FILE, GeneratedFile, find_file};
use agentforge_types::terminal::TerminalLine;

use super::backend::{ExecutionBackend, ExecutionOutput, ExecutionRequest};
use super::builtin::Builtin;
use super::completion::complete_filename;
use super::history::CommandHistory;
use crate::order::normalize;

/// Error line shown when the backend fails.
pub const BACKEND_FAILURE_MESSAGE: &str =
    "System Error: Could not execute command in the simulated environment.";

/// Tunables for one session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Bound on a single backend call.
    pub timeout: Duration,
    /// Trailing terminal lines sent as context.
    pub context_tail: usize,
    pub history_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&SessionSettings::default())
    }
}

impl From<&SessionSettings> for SessionOptions {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            timeout: settings.timeout(),
            context_tail: settings.context_tail,
            history_capacity: settings.history_capacity,
        }
    }
}

/// What happened to one submitted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed.
    Ignored,
    /// Another command is still executing; nothing changed.
    Busy,
    /// Resolved locally by a built-in.
    Builtin,
    /// The buffer was reset, by `clear` or by the backend's sentinel.
    Cleared,
    /// The backend answered with output.
    Executed,
    /// The backend failed or timed out; an error line was appended.
    Failed,
}

struct SessionState {
    lines: Vec<TerminalLine>,
    history: CommandHistory,
    active_file: Option<String>,
    executing: bool,
}

/// State of one open terminal bound to one agent's project.
///
/// At most one backend command is in flight at a time: `submit` takes an
/// execution lock with `try_lock` and reports `Busy` instead of queueing.
/// State sits behind a short-lived mutex that is never held across an await.
pub struct SessionEngine<B: ExecutionBackend> {
    agent_name: String,
    files: Vec<GeneratedFile>,
    details: OrderDetails,
    backend: B,
    options: SessionOptions,
    state: Mutex<SessionState>,
    exec_lock: tokio::sync::Mutex<()>,
}

/// Clears the executing flag when a backend call ends, even if the submit
/// future is dropped mid-flight.
struct ExecutingGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .executing = false;
    }
}

impl<B: ExecutionBackend> SessionEngine<B> {
    /// Open a session on a stored agent.
    pub fn open(agent: &Agent, backend: B, options: SessionOptions) -> Self {
        Self::new(
            agent.name.clone(),
            agent.generated_files.clone(),
            normalize(&agent.order),
            backend,
            options,
        )
    }

    pub fn new(
        agent_name: String,
        files: Vec<GeneratedFile>,
        details: OrderDetails,
        backend: B,
        options: SessionOptions,
    ) -> Self {
        let active_file = find_file(&files, CORE_LOGIC_FILE)
            .or_else(|| files.first())
            .map(|f| f.filename.clone());

        let lines = vec![
            TerminalLine::system(format!(
                "Connected to agent \"{agent_name}\". Welcome to the Command Center."
            )),
            TerminalLine::system("Type 'help' for a list of commands."),
        ];

        info!(agent = %agent_name, files = files.len(), "session opened");
        Self {
            state: Mutex::new(SessionState {
                lines,
                history: CommandHistory::new(options.history_capacity),
                active_file,
                executing: false,
            }),
            agent_name,
            files,
            details,
            backend,
            options,
            exec_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one line of user input.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let command = raw.trim();
        if command.is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Ok(_exec) = self.exec_lock.try_lock() else {
            debug!(command, "input rejected while a command is executing");
            return SubmitOutcome::Busy;
        };

        let context_tail = {
            let mut state = self.state();
            state.lines.push(TerminalLine::input(raw));
            if !command.eq_ignore_ascii_case("clear") {
                state.history.push(raw);
            }

            if let Some(builtin) = Builtin::parse(command) {
                debug!(?builtin, "resolving built-in");
                return match builtin.render(&self.files) {
                    Some(line) => {
                        state.lines.push(line);
                        SubmitOutcome::Builtin
                    }
                    None => {
                        state.lines.clear();
                        SubmitOutcome::Cleared
                    }
                };
            }

            state.executing = true;
            let start = state.lines.len().saturating_sub(self.options.context_tail);
            state.lines[start..].to_vec()
        };
        let _executing = ExecutingGuard { state: &self.state };

        let request = ExecutionRequest {
            command,
            files: &self.files,
            details: &self.details,
            context_tail: &context_tail,
        };
        debug!(command, context = context_tail.len(), "forwarding to execution backend");
        let result = tokio::time::timeout(self.options.timeout, self.backend.run(&request)).await;

        let mut state = self.state();
        state.executing = false;
        match result {
            Ok(Ok(ExecutionOutput::ClearTerminal)) => {
                state.lines.clear();
                SubmitOutcome::Cleared
            }
            Ok(Ok(ExecutionOutput::Stdout(text))) => {
                state.lines.push(TerminalLine::output(text));
                SubmitOutcome::Executed
            }
            Ok(Err(e)) => {
                warn!(agent = %self.agent_name, command, error = %e, "execution backend failed");
                state.lines.push(TerminalLine::error(BACKEND_FAILURE_MESSAGE));
                SubmitOutcome::Failed
            }
            Err(_) => {
                let secs = self.options.timeout.as_secs();
                warn!(
                    agent = %self.agent_name,
                    command,
                    timeout_secs = secs,
                    "execution backend timed out"
                );
                state.lines.push(TerminalLine::error(format!(
                    "System Error: command timed out after {secs}s."
                )));
                SubmitOutcome::Failed
            }
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    pub fn details(&self) -> &OrderDetails {
        &self.details
    }

    pub fn lines(&self) -> Vec<TerminalLine> {
        self.state().lines.clone()
    }

    /// Number of lines currently in the buffer.
    pub fn line_count(&self) -> usize {
        self.state().lines.len()
    }

    /// History entries, most recent first.
    pub fn history(&self) -> Vec<String> {
        self.state().history.entries().cloned().collect()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.state().history.cursor()
    }

    /// Recall the next older input, if any.
    pub fn history_older(&self) -> Option<String> {
        self.state().history.older()
    }

    /// Recall the next newer input; empty once past the newest.
    pub fn history_newer(&self) -> String {
        self.state().history.newer()
    }

    pub fn is_executing(&self) -> bool {
        self.state().executing
    }

    pub fn active_file(&self) -> Option<&GeneratedFile> {
        let name = self.state().active_file.clone()?;
        find_file(&self.files, &name)
    }

    /// Point the file viewer at `filename`. Returns `false` if no such file.
    pub fn select_file(&self, filename: &str) -> bool {
        if find_file(&self.files, filename).is_none() {
            return false;
        }
        self.state().active_file = Some(filename.to_string());
        true
    }

    /// Complete the last token of `input` to a project filename.
    pub fn complete(&self, input: &str) -> String {
        complete_filename(input, &self.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use agentforge_types::error::ExecutionError;
    use agentforge_types::terminal::LineKind;

    /// Backend that counts calls and replays a canned reply.
    struct ScriptedBackend {
        reply: Result<ExecutionOutput, ExecutionError>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        gate: Option<Notify>,
        delay: Option<Duration>,
        seen_context: Mutex<Vec<Vec<TerminalLine>>>,
    }

    impl ScriptedBackend {
        fn replying(reply: Result<ExecutionOutput, ExecutionError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                gate: None,
                delay: None,
                seen_context: Mutex::new(Vec::new()),
            }
        }

        fn stdout(text: &str) -> Self {
            Self::replying(Ok(ExecutionOutput::Stdout(text.to_string())))
        }

        fn gated() -> Self {
            Self {
                gate: Some(Notify::new()),
                ..Self::stdout("done")
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ExecutionBackend for ScriptedBackend {
        async fn run(
            &self,
            request: &ExecutionRequest<'_>,
        ) -> Result<ExecutionOutput, ExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.seen_context
                .lock()
                .unwrap()
                .push(request.context_tail.to_vec());

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn details() -> OrderDetails {
        OrderDetails {
            name: "Scout".to_string(),
            bot_type: "Conversational AI".to_string(),
            features: vec![],
            personality: Some("Helpful".to_string()),
            trading_tactic: None,
        }
    }

    fn engine_with(
        backend: ScriptedBackend,
        files: Vec<GeneratedFile>,
    ) -> SessionEngine<ScriptedBackend> {
        SessionEngine::new(
            "Scout".to_string(),
            files,
            details(),
            backend,
            SessionOptions::default(),
        )
    }

    fn engine(backend: ScriptedBackend) -> SessionEngine<ScriptedBackend> {
        engine_with(
            backend,
            vec![GeneratedFile::new("a.py", "X"), GeneratedFile::new("b.py", "Y")],
        )
    }

    fn last(engine: &SessionEngine<ScriptedBackend>) -> TerminalLine {
        engine.lines().last().cloned().unwrap()
    }

    #[test]
    fn test_open_seeds_welcome_lines() {
        let engine = engine(ScriptedBackend::stdout(""));
        let lines = engine.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.kind == LineKind::System));
        assert!(lines[0].content.contains("\"Scout\""));
        assert!(!engine.is_executing());
    }

    #[test]
    fn test_active_file_prefers_core_logic() {
        let files = vec![
            GeneratedFile::new("README.md", ""),
            GeneratedFile::new("agent.py", ""),
        ];
        let with_core = engine_with(ScriptedBackend::stdout(""), files);
        assert_eq!(with_core.active_file().unwrap().filename, "agent.py");

        let without_core = engine(ScriptedBackend::stdout(""));
        assert_eq!(without_core.active_file().unwrap().filename, "a.py");

        let empty = engine_with(ScriptedBackend::stdout(""), vec![]);
        assert!(empty.active_file().is_none());
    }

    #[test]
    fn test_select_file() {
        let engine = engine(ScriptedBackend::stdout(""));
        assert!(engine.select_file("b.py"));
        assert_eq!(engine.active_file().unwrap().content, "Y");
        assert!(!engine.select_file("c.py"));
        assert_eq!(engine.active_file().unwrap().filename, "b.py");
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let engine = engine(ScriptedBackend::stdout(""));
        assert_eq!(engine.submit("   ").await, SubmitOutcome::Ignored);
        assert_eq!(engine.line_count(), 2);
        assert!(engine.history().is_empty());
    }

    #[tokio::test]
    async fn test_help_never_reaches_backend() {
        let engine = engine(ScriptedBackend::stdout(""));
        assert_eq!(engine.submit("help").await, SubmitOutcome::Builtin);

        assert_eq!(engine.backend.calls(), 0);
        assert!(!engine.is_executing());
        let lines = engine.lines();
        assert_eq!(lines[2], TerminalLine::input("help"));
        assert!(lines[3].content.contains("Available commands"));
        assert_eq!(engine.history(), vec!["help"]);
    }

    #[tokio::test]
    async fn test_ls_and_cat() {
        let engine = engine(ScriptedBackend::stdout(""));

        engine.submit("ls").await;
        assert_eq!(last(&engine).content, "a.py   b.py");

        engine.submit("cat a.py").await;
        let line = last(&engine);
        assert_eq!(line.content, "--- Contents of a.py ---\nX");
        assert_eq!(line.kind, LineKind::Output);

        engine.submit("cat missing.py").await;
        assert!(last(&engine).content.contains("missing.py"));

        engine.submit("cat").await;
        assert_eq!(last(&engine).kind, LineKind::Error);
        assert_eq!(engine.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_truncates_and_skips_history() {
        let engine = engine(ScriptedBackend::stdout(""));
        engine.submit("ls").await;

        assert_eq!(engine.submit("CLEAR").await, SubmitOutcome::Cleared);
        assert!(engine.lines().is_empty());
        assert_eq!(engine.history(), vec!["ls"]);
        assert_eq!(engine.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_forwarded_command_appends_output() {
        let engine = engine(ScriptedBackend::stdout("Agent started."));
        assert_eq!(engine.submit("run").await, SubmitOutcome::Executed);

        assert_eq!(engine.backend.calls(), 1);
        assert_eq!(last(&engine), TerminalLine::output("Agent started."));
        assert!(!engine.is_executing());
    }

    #[tokio::test]
    async fn test_context_tail_is_last_four_lines() {
        let engine = engine(ScriptedBackend::stdout("ok"));
        engine.submit("ls").await;
        engine.submit("run").await;

        let seen = engine.backend.seen_context.lock().unwrap().clone();
        let tail = &seen[0];
        assert_eq!(tail.len(), 4);
        assert_eq!(tail[0].kind, LineKind::System);
        assert_eq!(tail[2], TerminalLine::output("a.py   b.py"));
        assert_eq!(tail[3], TerminalLine::input("run"));
    }

    #[tokio::test]
    async fn test_backend_sentinel_clears() {
        let engine = engine(ScriptedBackend::replying(Ok(ExecutionOutput::ClearTerminal)));
        assert_eq!(engine.submit("reset please").await, SubmitOutcome::Cleared);
        assert!(engine.lines().is_empty());
        assert_eq!(engine.history(), vec!["reset please"]);
    }

    #[tokio::test]
    async fn test_backend_failure_is_recovered() {
        let backend = ScriptedBackend::replying(Err(ExecutionError::Unavailable("offline".into())));
        let engine = engine(backend);

        assert_eq!(engine.submit("run").await, SubmitOutcome::Failed);
        assert_eq!(last(&engine), TerminalLine::error(BACKEND_FAILURE_MESSAGE));
        assert!(!engine.is_executing());

        // Still usable afterwards.
        assert_eq!(engine.submit("ls").await, SubmitOutcome::Builtin);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_timeout_is_recovered() {
        let backend = ScriptedBackend {
            delay: Some(Duration::from_secs(3600)),
            ..ScriptedBackend::stdout("late")
        };
        let engine = engine(backend);

        assert_eq!(engine.submit("run").await, SubmitOutcome::Failed);
        let line = last(&engine);
        assert_eq!(line.kind, LineKind::Error);
        assert!(line.content.contains("timed out after 60s"));
        assert!(!engine.is_executing());
    }

    #[tokio::test]
    async fn test_second_submit_while_executing_is_rejected() {
        let engine = engine(ScriptedBackend::gated());

        let first = engine.submit("run");
        let second = async {
            while !engine.is_executing() {
                tokio::task::yield_now().await;
            }
            let lines_before = engine.line_count();
            let outcome = engine.submit("status").await;
            assert_eq!(engine.line_count(), lines_before);
            engine.backend.gate.as_ref().unwrap().notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, SubmitOutcome::Executed);
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(engine.backend.calls(), 1);
        assert_eq!(engine.backend.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(engine.history(), vec!["run"]);
        assert!(!engine.is_executing());
    }

    #[tokio::test]
    async fn test_dropped_submit_does_not_stick_executing() {
        let engine = engine(ScriptedBackend::gated());
        {
            let pending = engine.submit("run");
            tokio::pin!(pending);
            assert!(poll_once(pending.as_mut()).await.is_none());
            assert!(engine.is_executing());
        }
        assert!(!engine.is_executing());
        assert_eq!(engine.submit("ls").await, SubmitOutcome::Builtin);
    }

    /// Poll a future exactly once.
    async fn poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        let mut fut = fut;
        std::future::poll_fn(|cx| {
            std::task::Poll::Ready(match std::pin::Pin::new(&mut fut).poll(cx) {
                std::task::Poll::Ready(out) => Some(out),
                std::task::Poll::Pending => None,
            })
        })
        .await
    }

    #[tokio::test]
    async fn test_history_caps_at_fifty() {
        let engine = engine(ScriptedBackend::stdout(""));
        for i in 1..=51 {
            engine.submit(&format!("cat f{i}")).await;
        }
        let history = engine.history();
        assert_eq!(history.len(), 50);
        assert_eq!(history[0], "cat f51");
        assert!(!history.contains(&"cat f1".to_string()));

        let mut recalled = Vec::new();
        while let Some(entry) = engine.history_older() {
            recalled.push(entry);
        }
        assert!(!recalled.contains(&"cat f1".to_string()));
        assert_eq!(engine.history_cursor(), Some(49));
        assert_eq!(engine.history_newer(), "cat f3");
    }

    #[test]
    fn test_complete_uses_project_files() {
        let engine = engine(ScriptedBackend::stdout(""));
        assert_eq!(engine.complete("cat b"), "cat b.py");
    }
}
