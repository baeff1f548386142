//! Forge collaborator adapters.

pub mod llm_synthesis;

pub use llm_synthesis::LlmCodeSynthesisClient;
