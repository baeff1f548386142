//! Global configuration types for AgentForge.
//!
//! `ForgeConfig` represents the top-level `config.toml` that selects the
//! LLM provider and bounds both collaborator calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration.
///
/// Loaded from `~/.agentforge/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub forge: ForgeSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Which LLM backs the code synthesis and execution collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}

/// Settings for the forge pipeline's code synthesis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeSettings {
    #[serde(default = "default_forge_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_forge_temperature")]
    pub temperature: f64,
    #[serde(default = "default_forge_max_tokens")]
    pub max_tokens: u32,
}

fn default_forge_timeout_secs() -> u64 {
    120
}

fn default_forge_temperature() -> f64 {
    0.4
}

fn default_forge_max_tokens() -> u32 {
    16_000
}

impl ForgeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_forge_timeout_secs(),
            temperature: default_forge_temperature(),
            max_tokens: default_forge_max_tokens(),
        }
    }
}

/// Settings for Command Center sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_session_temperature")]
    pub temperature: f64,
    #[serde(default = "default_session_max_tokens")]
    pub max_tokens: u32,
    /// Number of trailing terminal lines sent to the backend as context.
    #[serde(default = "default_context_tail")]
    pub context_tail: usize,
    /// Capacity of the input history ring buffer.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_session_timeout_secs() -> u64 {
    60
}

fn default_session_temperature() -> f64 {
    0.3
}

fn default_session_max_tokens() -> u32 {
    2048
}

fn default_context_tail() -> usize {
    4
}

fn default_history_capacity() -> usize {
    50
}

impl SessionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_session_timeout_secs(),
            temperature: default_session_temperature(),
            max_tokens: default_session_max_tokens(),
            context_tail: default_context_tail(),
            history_capacity: default_history_capacity(),
        }
    }
}
