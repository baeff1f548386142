//! Infrastructure layer for AgentForge.
//!
//! Contains implementations of the ports defined in `agentforge-core`:
//! SQLite agent storage, the Anthropic LLM provider, LLM-backed code
//! synthesis and command execution, plus config loading and filesystem
//! helpers.

pub mod config;
pub mod execution;
pub mod filesystem;
pub mod forge;
pub mod llm;
pub mod sqlite;
