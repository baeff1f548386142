//! Command Center execution backends.

pub mod llm_backend;

pub use llm_backend::LlmExecutionBackend;
