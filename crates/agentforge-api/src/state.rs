//! Application state wiring all services together.
//!
//! AppState pins the core generics to the concrete infra implementations.
//! LLM-backed collaborators are built on demand so commands that never
//! call the model (listing, export) work without an API key.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use agentforge_core::forge::ForgePipeline;
use agentforge_core::llm::box_provider::BoxLlmProvider;
use agentforge_core::registry::AgentRegistry;
use agentforge_core::service::forge::ForgeService;
use agentforge_core::session::{SessionEngine, SessionOptions};
use agentforge_infra::config::{load_forge_config, resolve_api_key};
use agentforge_infra::execution::LlmExecutionBackend;
use agentforge_infra::filesystem::resolve_data_dir;
use agentforge_infra::forge::LlmCodeSynthesisClient;
use agentforge_infra::llm::create_provider;
use agentforge_infra::sqlite::agent::SqliteAgentRepository;
use agentforge_infra::sqlite::pool::{DatabasePool, database_url};
use agentforge_types::agent::Agent;
use agentforge_types::config::ForgeConfig;
use agentforge_types::llm::LlmError;
use secrecy::ExposeSecret;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteRegistry = AgentRegistry<SqliteAgentRepository>;

pub type ConcreteForgeService = ForgeService<LlmCodeSynthesisClient, SqliteAgentRepository>;

pub type ConcreteSession = SessionEngine<LlmExecutionBackend>;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub config: ForgeConfig,
    pub registry: Arc<ConcreteRegistry>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, load the registry.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

        let config = load_forge_config(&data_dir).await;

        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url).await?;

        let registry = AgentRegistry::load(SqliteAgentRepository::new(db_pool)).await?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            data_dir,
        })
    }

    /// Build the configured LLM provider, failing with guidance if no key is set.
    fn provider(&self) -> anyhow::Result<BoxLlmProvider> {
        let api_key = resolve_api_key(&self.config.llm);
        create_provider(&self.config.llm, api_key.as_ref().map(|k| k.expose_secret()))
            .map_err(|e| match e {
                LlmError::AuthenticationFailed => anyhow::anyhow!(
                    "No API key found. Set the {} environment variable.",
                    self.config.llm.api_key_env
                ),
                other => anyhow::Error::new(other),
            })
    }

    /// Forge service with an LLM-backed synthesis client.
    pub fn forge_service(&self) -> anyhow::Result<ConcreteForgeService> {
        let client = LlmCodeSynthesisClient::from_settings(
            self.provider()?,
            &self.config.llm,
            &self.config.forge,
        );
        let pipeline = ForgePipeline::new(client, self.config.forge.timeout());
        Ok(ForgeService::new(pipeline, Arc::clone(&self.registry)))
    }

    /// Open a Command Center session on `agent`.
    pub fn open_session(&self, agent: &Agent) -> anyhow::Result<ConcreteSession> {
        let backend = LlmExecutionBackend::from_settings(
            self.provider()?,
            &self.config.llm,
            &self.config.session,
        );
        Ok(SessionEngine::open(
            agent,
            backend,
            SessionOptions::from(&self.config.session),
        ))
    }
}
