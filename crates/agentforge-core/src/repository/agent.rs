//! Agent repository trait definition.

use agentforge_types::agent::{Agent, AgentId};
use agentforge_types::error::RepositoryError;

/// Durable keyed store of forged agents.
///
/// Implementations live in agentforge-infra (e.g., SqliteAgentRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait AgentRepository: Send + Sync {
    /// Every stored agent, in insertion order.
    fn load_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;

    /// Persist a new agent. Fails with `Conflict` if the id is taken.
    fn insert(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete an agent. Deleting an absent id succeeds and changes nothing.
    fn delete(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
