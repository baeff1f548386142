//! The forge pipeline: order in, validated project out.

use std::time::Duration;

use tracing::{debug, info, warn};

use agentforge_types::build_log::{BuildLogLevel, BuildLogLine};
use agentforge_types::error::GenerationError;
use agentforge_types::order::Order;
use agentforge_types::project::GeneratedFile;

use super::prompt::build_generation_prompt;
use super::synthesis::{CodeSynthesisClient, GenerationRequest, ProjectSchema};
use super::validate::{check_critical_files, duplicate_filenames, parse_project};
use crate::order::normalize;

/// Drives normalization, code synthesis and validation for one order at a time.
///
/// Every run reports progress through a callback in a fixed order:
/// INFO, INFO, GEN, VALIDATE, VALIDATE on success. A failing run stops at
/// the stage that detected the fault and emits exactly one ERROR line.
pub struct ForgePipeline<C: CodeSynthesisClient> {
    client: C,
    timeout: Duration,
}

impl<C: CodeSynthesisClient> ForgePipeline<C> {
    /// `timeout` bounds the synthesis call.
    pub fn new(client: C, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forge a project for `order`, reporting each stage to `on_progress`.
    ///
    /// No retries: the first failure ends the run.
    pub async fn generate<F>(
        &self,
        order: &Order,
        mut on_progress: F,
    ) -> Result<Vec<GeneratedFile>, GenerationError>
    where
        F: FnMut(BuildLogLine) + Send,
    {
        let result = self.run_stages(order, &mut on_progress).await;

        if let Err(err) = &result {
            warn!(order = %order.name(), kind = err.kind(), error = %err, "forge run failed");
            on_progress(BuildLogLine::new(
                BuildLogLevel::Error,
                format!("Forge failed: {}", err.user_message()),
            ));
        }
        result
    }

    async fn run_stages<F>(
        &self,
        order: &Order,
        on_progress: &mut F,
    ) -> Result<Vec<GeneratedFile>, GenerationError>
    where
        F: FnMut(BuildLogLine) + Send,
    {
        on_progress(BuildLogLine::new(
            BuildLogLevel::Info,
            "Order received. Initializing Forge environment...",
        ));
        let details = normalize(order);

        on_progress(BuildLogLine::new(
            BuildLogLevel::Info,
            format!("Analyzing blueprint for a {}...", details.bot_type),
        ));
        let request = GenerationRequest {
            prompt: build_generation_prompt(&details),
            details,
            schema: ProjectSchema::generated_files(),
        };

        on_progress(BuildLogLine::new(
            BuildLogLevel::Gen,
            "Engaging model to generate project files...",
        ));
        info!(
            order = %order.name(),
            bot_type = %request.details.bot_type,
            timeout_secs = self.timeout.as_secs(),
            "requesting project synthesis"
        );
        let raw = match tokio::time::timeout(self.timeout, self.client.generate(&request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(GenerationError::Timeout {
                    secs: self.timeout.as_secs(),
                });
            }
        };
        debug!(bytes = raw.len(), "synthesis response received");

        on_progress(BuildLogLine::new(
            BuildLogLevel::Validate,
            "Parsing generated code...",
        ));
        let files = parse_project(&raw)?;

        on_progress(BuildLogLine::new(
            BuildLogLevel::Validate,
            "Validating critical files (main.py, agent.py)...",
        ));
        check_critical_files(&files)?;

        let dups = duplicate_filenames(&files);
        if !dups.is_empty() {
            warn!(?dups, "generated project repeats filenames");
        }

        info!(order = %order.name(), files = files.len(), "project forged");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agentforge_types::build_log::BuildLog;
    use agentforge_types::error::SynthesisError;
    use agentforge_types::order::{CustomBuild, PricingTier};

    use agentforge_types::build_log::BuildLogLevel::*;

    /// Replies with a canned response and records the requests it saw.
    struct CannedClient {
        reply: Result<String, SynthesisError>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl CannedClient {
        fn ok(raw: impl Into<String>) -> Self {
            Self {
                reply: Ok(raw.into()),
                delay: None,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing(err: SynthesisError) -> Self {
            Self {
                reply: Err(err),
                ..Self::ok("")
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::ok("[]")
            }
        }
    }

    impl CodeSynthesisClient for CannedClient {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone()
        }
    }

    fn project(names: &[&str]) -> String {
        let files: Vec<_> = names
            .iter()
            .map(|n| GeneratedFile::new(*n, format!("# {n}")))
            .collect();
        serde_json::to_string(&files).unwrap()
    }

    fn full_project() -> String {
        project(&["requirements.txt", "config.ini", "agent.py", "main.py", "README.md"])
    }

    fn tier_order() -> Order {
        Order::Tier(PricingTier {
            id: "hunter_agent".to_string(),
            name: "Hunter Agent".to_string(),
            description: String::new(),
            features: vec!["Long-term memory".to_string()],
            is_popular: true,
        })
    }

    fn trading_order() -> Order {
        Order::Custom(CustomBuild {
            name: "Ticker".to_string(),
            bot_type: "Trading Bot".to_string(),
            features: vec![],
            personality: None,
            trading_tactic: Some("RSI Crossover".to_string()),
        })
    }

    async fn run(
        client: CannedClient,
        order: &Order,
    ) -> (Result<Vec<GeneratedFile>, GenerationError>, BuildLog) {
        let pipeline = ForgePipeline::new(client, Duration::from_secs(5));
        let mut log = BuildLog::new();
        let result = pipeline
            .generate(order, |line| {
                log.push(line);
            })
            .await;
        (result, log)
    }

    #[tokio::test]
    async fn test_success_emits_five_lines_in_order() {
        let (result, log) = run(CannedClient::ok(full_project()), &tier_order()).await;

        let files = result.unwrap();
        assert_eq!(files.len(), 5);
        assert_eq!(log.levels(), vec![Info, Info, Gen, Validate, Validate]);
        assert!(!log.is_terminal());
        assert_eq!(
            log.lines()[1].message,
            "Analyzing blueprint for a Conversational AI..."
        );
    }

    #[tokio::test]
    async fn test_success_returns_files_unmodified_and_in_order() {
        let names = [
            "README.md",
            "main.py",
            "extra.py",
            "agent.py",
            "config.ini",
            "requirements.txt",
        ];
        let raw = project(&names);
        let (result, _) = run(CannedClient::ok(raw.clone()), &trading_order()).await;

        let expected: Vec<GeneratedFile> = serde_json::from_str(&raw).unwrap();
        assert_eq!(result.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_collaborator_failure_stops_after_gen() {
        let (result, log) =
            run(CannedClient::failing(SynthesisError::RateLimited), &tier_order()).await;

        assert_eq!(result.unwrap_err(), GenerationError::RateLimited);
        assert_eq!(log.levels(), vec![Info, Info, Gen, Error]);
        assert_eq!(
            log.outcome().unwrap().message,
            "Forge failed: The Forge is currently at maximum capacity. Please try again in a few moments."
        );
    }

    #[tokio::test]
    async fn test_unknown_failure_passes_message_through() {
        let client = CannedClient::failing(SynthesisError::Failed("socket hang up".into()));
        let (result, log) = run(client, &tier_order()).await;

        assert_eq!(result.unwrap_err(), GenerationError::Unknown("socket hang up".into()));
        assert_eq!(log.outcome().unwrap().message, "Forge failed: socket hang up");
    }

    #[tokio::test]
    async fn test_malformed_response_fails_in_first_validate() {
        let (result, log) = run(CannedClient::ok("not json at all"), &tier_order()).await;

        assert!(matches!(result.unwrap_err(), GenerationError::MalformedResponse(_)));
        assert_eq!(log.levels(), vec![Info, Info, Gen, Validate, Error]);
    }

    #[tokio::test]
    async fn test_four_files_is_incomplete() {
        let raw = project(&["agent.py", "main.py", "README.md", "config.ini"]);
        let (result, log) = run(CannedClient::ok(raw), &tier_order()).await;

        assert_eq!(result.unwrap_err(), GenerationError::IncompleteProject { found: 4 });
        assert_eq!(log.levels(), vec![Info, Info, Gen, Validate, Error]);
    }

    #[tokio::test]
    async fn test_missing_core_logic_fails_in_second_validate() {
        let raw = project(&["requirements.txt", "config.ini", "bot.py", "main.py", "README.md"]);
        let (result, log) = run(CannedClient::ok(raw), &tier_order()).await;

        assert_eq!(
            result.unwrap_err(),
            GenerationError::MissingCriticalFile {
                filename: "agent.py".to_string()
            }
        );
        assert_eq!(log.levels(), vec![Info, Info, Gen, Validate, Validate, Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_collaborator_times_out() {
        let pipeline = ForgePipeline::new(
            CannedClient::slow(Duration::from_secs(600)),
            Duration::from_secs(30),
        );
        let mut levels = Vec::new();
        let err = pipeline
            .generate(&tier_order(), |line| levels.push(line.level))
            .await
            .unwrap_err();

        assert_eq!(err, GenerationError::Timeout { secs: 30 });
        assert!(err.is_retryable());
        assert_eq!(levels, vec![Info, Info, Gen, Error]);
    }

    #[tokio::test]
    async fn test_prompt_built_from_normalized_order() {
        let client = CannedClient::ok(full_project());
        let pipeline = ForgePipeline::new(client, Duration::from_secs(5));
        pipeline.generate(&trading_order(), |_| {}).await.unwrap();

        assert_eq!(pipeline.client.calls.load(Ordering::SeqCst), 1);
        let prompt = pipeline.client.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("- Trading Tactic: RSI Crossover"));
        assert!(prompt.contains("ccxt"));
    }
}
