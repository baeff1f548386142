//! SQLite agent repository implementation.
//!
//! Implements `AgentRepository` from `agentforge-core`. Each agent is stored
//! as one versioned JSON record; `seq` keeps insertion order.

use agentforge_core::repository::agent::AgentRepository;
use agentforge_types::agent::{AGENT_RECORD_VERSION, Agent, AgentId, StoredAgent};
use agentforge_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `AgentRepository`.
pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to a domain Agent.
struct AgentRow {
    id: String,
    schema_version: i64,
    record: String,
    created_at: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            schema_version: row.try_get("schema_version")?,
            record: row.try_get("record")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        if self.schema_version != i64::from(AGENT_RECORD_VERSION) {
            return Err(RepositoryError::Query(format!(
                "agent {} has unsupported record version {}",
                self.id, self.schema_version
            )));
        }

        let stored: StoredAgent = serde_json::from_str(&self.record)
            .map_err(|e| RepositoryError::Query(format!("invalid agent record {}: {e}", self.id)))?;

        if stored.version != AGENT_RECORD_VERSION {
            return Err(RepositoryError::Query(format!(
                "agent {} record declares version {}",
                self.id, stored.version
            )));
        }

        let id = self
            .id
            .parse::<AgentId>()
            .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?;
        if stored.agent.id != id {
            return Err(RepositoryError::Query(format!(
                "agent record id {} does not match row id {id}",
                stored.agent.id
            )));
        }

        let mut agent = stored.agent;
        agent.created_at = parse_datetime(&self.created_at)?;
        Ok(agent)
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl AgentRepository for SqliteAgentRepository {
    async fn load_all(&self) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, schema_version, record, created_at FROM agents ORDER BY seq ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                AgentRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_agent()
            })
            .collect()
    }

    async fn insert(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let record = serde_json::to_string(&StoredAgent::current(agent.clone()))
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO agents (id, schema_version, record, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(agent.id.to_string())
        .bind(i64::from(AGENT_RECORD_VERSION))
        .bind(&record)
        .bind(format_datetime(&agent.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("agent {} already exists", agent.id))
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        Ok(())
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
