//! Business logic and port definitions for AgentForge.
//!
//! This crate defines the "ports" (repository and collaborator traits) that
//! the infrastructure layer implements, plus the forge pipeline, the agent
//! registry and the Command Center session engine. It depends only on
//! `agentforge-types` -- never on `agentforge-infra` or any IO crate.

pub mod forge;
pub mod llm;
pub mod order;
pub mod registry;
pub mod repository;
pub mod service;
pub mod session;
