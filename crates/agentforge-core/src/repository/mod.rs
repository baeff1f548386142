//! Repository trait definitions (ports).
//!
//! The storage interface the infrastructure layer (agentforge-infra)
//! implements. The core crate never depends on a storage technology.

pub mod agent;
