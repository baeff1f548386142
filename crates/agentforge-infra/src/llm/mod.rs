//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `agentforge-core` and a provider factory ([`create_provider`]) that builds
//! the configured one from [`LlmSettings`].
//!
//! [`LlmProvider`]: agentforge_core::llm::provider::LlmProvider

pub mod anthropic;

use secrecy::SecretString;

use agentforge_core::llm::box_provider::BoxLlmProvider;
use agentforge_types::config::LlmSettings;
use agentforge_types::llm::{LlmError, ProviderType};

use self::anthropic::AnthropicProvider;

/// Create a [`BoxLlmProvider`] from the `[llm]` config section.
///
/// # Errors
///
/// Returns [`LlmError::InvalidRequest`] for an unknown provider name and
/// [`LlmError::AuthenticationFailed`] when no API key was resolved.
pub fn create_provider(
    settings: &LlmSettings,
    api_key: Option<&str>,
) -> Result<BoxLlmProvider, LlmError> {
    let provider_type: ProviderType = settings
        .provider
        .parse()
        .map_err(LlmError::InvalidRequest)?;

    match provider_type {
        ProviderType::Anthropic => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            let secret = SecretString::from(key.to_string());
            let mut provider = AnthropicProvider::new(secret, settings.model.clone())?;
            if let Some(base_url) = &settings.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(BoxLlmProvider::new(provider))
        }
    }
}
