//! Global configuration loader for AgentForge.
//!
//! Reads `config.toml` from the data directory (`~/.agentforge/` in production)
//! and deserializes it into [`ForgeConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use secrecy::SecretString;

use agentforge_types::config::{ForgeConfig, LlmSettings};

use crate::filesystem::LocalFileSystem;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ForgeConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Missing sections and keys take their defaults.
pub async fn load_forge_config(data_dir: &Path) -> ForgeConfig {
    let config_path = LocalFileSystem::config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ForgeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ForgeConfig::default();
        }
    };

    match toml::from_str::<ForgeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ForgeConfig::default()
        }
    }
}

/// Read the LLM API key from the environment variable named by `api_key_env`.
///
/// Empty values count as unset.
pub fn resolve_api_key(settings: &LlmSettings) -> Option<SecretString> {
    match std::env::var(&settings.api_key_env) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        Ok(_) => None,
        // Not present, or not valid unicode: either way there is no usable key.
        Err(_) => None,
    }
}
