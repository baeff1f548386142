//! Shared domain types for AgentForge.
//!
//! Orders, generated projects, build logs, agents, terminal lines, LLM
//! request shapes, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, schemars.

pub mod agent;
pub mod build_log;
pub mod config;
pub mod error;
pub mod llm;
pub mod order;
pub mod project;
pub mod terminal;
