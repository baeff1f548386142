//! LLM-simulated command execution.
//!
//! `LlmExecutionBackend` implements the `ExecutionBackend` port by asking an
//! LLM to play the shell the generated agent runs in and answer with the
//! command's stdout.

use std::fmt::Write as _;

use agentforge_core::llm::box_provider::BoxLlmProvider;
use agentforge_core::order::DEFAULT_PERSONALITY;
use agentforge_core::session::{CLEAR_SENTINEL, ExecutionBackend, ExecutionOutput, ExecutionRequest};
use agentforge_types::config::{LlmSettings, SessionSettings};
use agentforge_types::error::ExecutionError;
use agentforge_types::llm::{CompletionRequest, LlmError, Message};
use agentforge_types::project::{CORE_LOGIC_FILE, ENTRY_POINT_FILE, find_file};

/// Characters of `agent.py` included in the prompt.
const CORE_LOGIC_EXCERPT_CHARS: usize = 1000;

/// Characters of `main.py` included in the prompt.
const ENTRY_POINT_EXCERPT_CHARS: usize = 600;

/// Execution backend that simulates a shell with an LLM.
pub struct LlmExecutionBackend {
    provider: BoxLlmProvider,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl LlmExecutionBackend {
    pub fn new(provider: BoxLlmProvider, model: String, temperature: f64, max_tokens: u32) -> Self {
        Self {
            provider,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Build from the `[llm]` and `[session]` config sections.
    pub fn from_settings(
        provider: BoxLlmProvider,
        llm: &LlmSettings,
        session: &SessionSettings,
    ) -> Self {
        Self::new(provider, llm.model.clone(), session.temperature, session.max_tokens)
    }
}

/// First `max` characters of `s`, never splitting a character.
fn excerpt(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Render the simulation prompt for one command.
pub fn build_execution_prompt(request: &ExecutionRequest<'_>) -> String {
    let details = request.details;
    let personality = details.personality.as_deref().unwrap_or(DEFAULT_PERSONALITY);
    let core_logic = find_file(request.files, CORE_LOGIC_FILE)
        .map(|f| f.content.as_str())
        .unwrap_or_default();
    let entry_point = find_file(request.files, ENTRY_POINT_FILE)
        .map(|f| f.content.as_str())
        .unwrap_or_default();

    let mut prompt = String::new();
    prompt.push_str(
        "You are the backend of a Live Execution Environment. A user sends a command \
         from a web terminal to a shell in which their generated Python agent is running.\n\
         Simulate what the command would print. Output ONLY its stdout, concise and direct \
         like a real terminal.\n\n",
    );

    prompt.push_str("CONTEXT:\n");
    let _ = writeln!(prompt, "- Agent Name: {}", details.name);
    let _ = writeln!(prompt, "- Agent Personality: {personality}");
    let _ = writeln!(prompt, "- Agent Features: {}", details.features.join(", "));
    let _ = writeln!(
        prompt,
        "- Core Logic ({CORE_LOGIC_FILE}): \"\"\"{}...\"\"\"",
        excerpt(core_logic, CORE_LOGIC_EXCERPT_CHARS)
    );
    let _ = writeln!(
        prompt,
        "- Entrypoint ({ENTRY_POINT_FILE}): \"\"\"{}...\"\"\"",
        excerpt(entry_point, ENTRY_POINT_EXCERPT_CHARS)
    );
    let _ = writeln!(
        prompt,
        "- Conversation History (last {} entries):",
        request.context_tail.len()
    );
    for line in request.context_tail {
        let _ = writeln!(prompt, "  {}", line.as_transcript_turn());
    }

    let _ = write!(
        prompt,
        "\nCOMMAND TO EXECUTE: \"{}\"\n\n\
         INSTRUCTIONS:\n\
         1. If the command is \"run\" or \"run <args>\", simulate running {ENTRY_POINT_FILE}; \
         the agent usually introduces itself and states its purpose.\n\
         2. \"exit\" gets a short in-character sign-off.\n\
         3. To reset the screen, answer with exactly {CLEAR_SENTINEL}.\n\
         4. Anything else is a message to the running agent: answer in character, using its \
         features when the message calls for them.\n\
         5. Stay a terminal. No explanations or commentary.\n\n\
         STDOUT:\n",
        request.command
    );
    prompt
}

fn map_llm_error(err: LlmError) -> ExecutionError {
    if err.is_capacity() || matches!(err, LlmError::AuthenticationFailed) {
        ExecutionError::Unavailable(err.to_string())
    } else {
        ExecutionError::Failed(err.to_string())
    }
}

impl ExecutionBackend for LlmExecutionBackend {
    async fn run(&self, request: &ExecutionRequest<'_>) -> Result<ExecutionOutput, ExecutionError> {
        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(build_execution_prompt(request))],
            system: None,
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            stop_sequences: None,
            output_config: None,
        };

        tracing::debug!(
            command = %request.command,
            context = request.context_tail.len(),
            "simulating command"
        );

        let response = self.provider.complete(&completion).await.map_err(|e| {
            tracing::warn!(command = %request.command, error = %e, "command simulation failed");
            map_llm_error(e)
        })?;

        Ok(ExecutionOutput::from_raw(response.content.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use agentforge_core::llm::provider::LlmProvider;
    use agentforge_types::llm::{
        CompletionResponse, ProviderCapabilities, StopReason, Usage,
    };
    use agentforge_types::order::OrderDetails;
    use agentforge_types::project::GeneratedFile;
    use agentforge_types::terminal::TerminalLine;

    struct MockLlmProvider {
        reply: Mutex<Option<Result<String, LlmError>>>,
    }

    impl MockLlmProvider {
        fn replying(reply: Result<String, LlmError>) -> BoxLlmProvider {
            BoxLlmProvider::new(Self {
                reply: Mutex::new(Some(reply)),
            })
        }
    }

    impl LlmProvider for MockLlmProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &ProviderCapabilities {
                structured_output: false,
                max_context_tokens: 200_000,
                max_output_tokens: 4_096,
            }
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            assert!(request.messages[0].content.contains("COMMAND TO EXECUTE"));
            let content = self.reply.lock().unwrap().take().expect("one call per mock")?;
            Ok(CompletionResponse {
                id: "msg_mock".to_string(),
                content,
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    fn details() -> OrderDetails {
        OrderDetails {
            name: "Ticker".to_string(),
            bot_type: "Trading Bot".to_string(),
            features: vec!["Web Search".to_string(), "Memory".to_string()],
            personality: None,
            trading_tactic: Some("RSI Crossover".to_string()),
        }
    }

    fn files() -> Vec<GeneratedFile> {
        vec![
            GeneratedFile::new("main.py", "m".repeat(700)),
            GeneratedFile::new("agent.py", "é".repeat(1200)),
        ]
    }

    async fn run_with(reply: Result<String, LlmError>) -> Result<ExecutionOutput, ExecutionError> {
        let backend =
            LlmExecutionBackend::new(MockLlmProvider::replying(reply), "m".to_string(), 0.3, 256);
        let files = files();
        let details = details();
        let tail = [TerminalLine::input("run")];
        let request = ExecutionRequest {
            command: "run",
            files: &files,
            details: &details,
            context_tail: &tail,
        };
        backend.run(&request).await
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo", 2), "hé");
        assert_eq!(excerpt("abc", 10), "abc");
        assert_eq!(excerpt("", 3), "");
    }

    #[test]
    fn test_prompt_contains_context() {
        let files = files();
        let details = details();
        let tail = [
            TerminalLine::input("hello"),
            TerminalLine::output("Hi there."),
            TerminalLine::input("status"),
        ];
        let request = ExecutionRequest {
            command: "status",
            files: &files,
            details: &details,
            context_tail: &tail,
        };

        let prompt = build_execution_prompt(&request);
        assert!(prompt.contains("- Agent Name: Ticker"));
        assert!(prompt.contains("- Agent Personality: Professional"));
        assert!(prompt.contains("- Agent Features: Web Search, Memory"));
        assert!(prompt.contains(&format!("\"\"\"{}...\"\"\"", "é".repeat(1000))));
        assert!(!prompt.contains(&"é".repeat(1001)));
        assert!(prompt.contains(&format!("\"\"\"{}...\"\"\"", "m".repeat(600))));
        assert!(prompt.contains("  User: hello\n  Agent: Hi there.\n  User: status\n"));
        assert!(prompt.contains("COMMAND TO EXECUTE: \"status\""));
    }

    #[tokio::test]
    async fn test_run_trims_stdout() {
        let out = run_with(Ok("  Hello, I am Ticker.\n".to_string())).await.unwrap();
        assert_eq!(out, ExecutionOutput::Stdout("Hello, I am Ticker.".to_string()));
    }

    #[tokio::test]
    async fn test_run_recognizes_clear_sentinel() {
        let out = run_with(Ok("CLEAR_TERMINAL\n".to_string())).await.unwrap();
        assert_eq!(out, ExecutionOutput::ClearTerminal);
    }

    #[tokio::test]
    async fn test_run_maps_errors() {
        let err = run_with(Err(LlmError::Overloaded("busy".to_string()))).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Unavailable(_)));

        let err = run_with(Err(LlmError::Deserialization("bad".to_string()))).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Failed(_)));
    }
}
