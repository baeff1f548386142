//! The agent registry: process-wide view of forged agents.

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use agentforge_types::agent::{Agent, AgentId, AgentStatus};
use agentforge_types::error::RepositoryError;
use agentforge_types::order::Order;
use agentforge_types::project::GeneratedFile;

use crate::repository::agent::AgentRepository;

/// Why an id or id prefix did not resolve to exactly one agent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentLookupError {
    #[error("no agent matches '{0}'")]
    NotFound(String),

    #[error("'{query}' matches {count} agents, use a longer id")]
    Ambiguous { query: String, count: usize },
}

/// Keyed store of completed agents, shared by handle across the app.
///
/// Writes go to the repository first and are then published to the
/// in-memory list while the write lock is held, so readers never observe a
/// half-registered or half-removed agent.
pub struct AgentRegistry<R: AgentRepository> {
    repo: R,
    agents: RwLock<Vec<Agent>>,
}

impl<R: AgentRepository> AgentRegistry<R> {
    /// Read every persisted agent and build the registry.
    pub async fn load(repo: R) -> Result<Self, RepositoryError> {
        let agents = repo.load_all().await?;
        info!(count = agents.len(), "agent registry loaded");
        Ok(Self {
            repo,
            agents: RwLock::new(agents),
        })
    }

    /// Register a freshly forged agent.
    ///
    /// Assigns id, timestamp and `Active` status. No validation happens here.
    pub async fn insert(
        &self,
        order: Order,
        files: Vec<GeneratedFile>,
    ) -> Result<Agent, RepositoryError> {
        let agent = Agent {
            id: AgentId::new(),
            name: order.name().to_string(),
            status: AgentStatus::Active,
            order,
            created_at: Utc::now(),
            generated_files: files,
        };

        let mut agents = self.agents.write().await;
        self.repo.insert(&agent).await?;
        agents.push(agent.clone());

        info!(agent_id = %agent.id, name = %agent.name, "agent registered");
        Ok(agent)
    }

    /// Remove an agent. Idempotent: returns `false` if it was not registered.
    pub async fn remove(&self, id: &AgentId) -> Result<bool, RepositoryError> {
        let mut agents = self.agents.write().await;
        self.repo.delete(id).await?;

        let Some(pos) = agents.iter().position(|a| &a.id == id) else {
            return Ok(false);
        };
        agents.remove(pos);
        info!(agent_id = %id, "agent removed");
        Ok(true)
    }

    /// All agents in insertion order.
    pub async fn list(&self) -> Vec<Agent> {
        self.agents.read().await.clone()
    }

    pub async fn get(&self, id: &AgentId) -> Option<Agent> {
        self.agents.read().await.iter().find(|a| &a.id == id).cloned()
    }

    /// Resolve a full id or a unique id prefix (dashes optional).
    pub async fn find(&self, query: &str) -> Result<Agent, AgentLookupError> {
        let needle = query.trim().to_lowercase().replace('-', "");
        if needle.is_empty() {
            return Err(AgentLookupError::NotFound(query.to_string()));
        }

        let agents = self.agents.read().await;
        let matches: Vec<&Agent> = agents
            .iter()
            .filter(|a| a.id.0.simple().to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [agent] => Ok((*agent).clone()),
            [] => Err(AgentLookupError::NotFound(query.to_string())),
            many => Err(AgentLookupError::Ambiguous {
                query: query.to_string(),
                count: many.len(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}
