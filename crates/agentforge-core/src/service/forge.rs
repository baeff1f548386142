//! Forge-and-register service.
//!
//! Runs the forge pipeline and, when it succeeds, registers the agent and
//! emits the trailing DEPLOY / SUCCESS lines.

use std::sync::Arc;

use tracing::{error, info};

use agentforge_types::agent::Agent;
use agentforge_types::build_log::{BuildLogLevel, BuildLogLine};
use agentforge_types::error::ForgeError;
use agentforge_types::order::Order;

use crate::forge::{CodeSynthesisClient, ForgePipeline};
use crate::registry::AgentRegistry;
use crate::repository::agent::AgentRepository;

pub struct ForgeService<C: CodeSynthesisClient, R: AgentRepository> {
    pipeline: ForgePipeline<C>,
    registry: Arc<AgentRegistry<R>>,
}

impl<C: CodeSynthesisClient, R: AgentRepository> ForgeService<C, R> {
    pub fn new(pipeline: ForgePipeline<C>, registry: Arc<AgentRegistry<R>>) -> Self {
        Self { pipeline, registry }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry<R>> {
        &self.registry
    }

    /// Forge an agent for `order` and register it.
    ///
    /// The registry is only touched after the pipeline returned a validated
    /// project. On success the log ends with SUCCESS, otherwise with ERROR.
    pub async fn forge<F>(&self, order: Order, mut on_progress: F) -> Result<Agent, ForgeError>
    where
        F: FnMut(BuildLogLine) + Send,
    {
        let files = self.pipeline.generate(&order, &mut on_progress).await?;

        on_progress(BuildLogLine::new(
            BuildLogLevel::Deploy,
            "Registering agent to your account...",
        ));
        let agent = match self.registry.insert(order, files).await {
            Ok(agent) => agent,
            Err(e) => {
                error!(error = %e, "forged agent could not be registered");
                on_progress(BuildLogLine::new(
                    BuildLogLevel::Error,
                    format!("Forge failed: could not register agent ({e})"),
                ));
                return Err(ForgeError::Registry(e));
            }
        };

        on_progress(BuildLogLine::new(
            BuildLogLevel::Success,
            format!("Agent \"{}\" successfully forged and deployed!", agent.name),
        ));
        info!(agent_id = %agent.id, "forge complete");
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use agentforge_types::build_log::BuildLog;
    use agentforge_types::build_log::BuildLogLevel::*;
    use agentforge_types::error::{GenerationError, SynthesisError};
    use agentforge_types::project::GeneratedFile;

    use crate::forge::GenerationRequest;
    use crate::registry::tests::{MemoryRepo, order};

    struct FixedClient(Result<String, SynthesisError>);

    impl CodeSynthesisClient for FixedClient {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, SynthesisError> {
            self.0.clone()
        }
    }

    fn valid_project() -> String {
        let files: Vec<_> = ["requirements.txt", "config.ini", "agent.py", "main.py", "README.md"]
            .iter()
            .map(|n| GeneratedFile::new(*n, ""))
            .collect();
        serde_json::to_string(&files).unwrap()
    }

    async fn service(
        reply: Result<String, SynthesisError>,
        repo: MemoryRepo,
    ) -> ForgeService<FixedClient, MemoryRepo> {
        let registry = Arc::new(AgentRegistry::load(repo).await.unwrap());
        ForgeService::new(
            ForgePipeline::new(FixedClient(reply), Duration::from_secs(5)),
            registry,
        )
    }

    #[tokio::test]
    async fn test_success_registers_and_reports_deploy() {
        let service = service(Ok(valid_project()), MemoryRepo::default()).await;
        let mut log = BuildLog::new();

        let agent = service
            .forge(order("Nova"), |line| {
                log.push(line);
            })
            .await
            .unwrap();

        assert_eq!(
            log.levels(),
            vec![Info, Info, Gen, Validate, Validate, Deploy, Success]
        );
        assert_eq!(
            log.outcome().unwrap().message,
            "Agent \"Nova\" successfully forged and deployed!"
        );
        assert_eq!(service.registry().list().await, vec![agent]);
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_registry_untouched() {
        let service = service(Ok("[]".to_string()), MemoryRepo::default()).await;
        let mut levels = Vec::new();

        let err = service
            .forge(order("Broken"), |line| levels.push(line.level))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Generation(GenerationError::IncompleteProject { found: 0 })
        ));
        assert_eq!(levels.last(), Some(&Error));
        assert!(!levels.contains(&Deploy));
        assert!(service.registry().is_empty().await);
    }

    #[tokio::test]
    async fn test_registry_failure_ends_with_error() {
        let repo = MemoryRepo::default();
        repo.fail_writes.store(true, Ordering::SeqCst);
        let service = service(Ok(valid_project()), repo).await;
        let mut levels = Vec::new();

        let err = service
            .forge(order("Orphan"), |line| levels.push(line.level))
            .await
            .unwrap_err();

        assert!(matches!(err, ForgeError::Registry(_)));
        assert_eq!(levels[5..], [Deploy, Error]);
        assert!(service.registry().is_empty().await);
    }
}
