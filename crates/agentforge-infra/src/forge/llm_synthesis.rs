//! LLM-backed code synthesis.
//!
//! `LlmCodeSynthesisClient` implements the `CodeSynthesisClient` port by
//! sending the forge prompt through a [`BoxLlmProvider`]. When the provider
//! supports structured output the response is constrained to the project
//! schema via `output_config`.

use agentforge_core::forge::{CodeSynthesisClient, GenerationRequest};
use agentforge_core::llm::box_provider::BoxLlmProvider;
use agentforge_types::config::{ForgeSettings, LlmSettings};
use agentforge_types::error::SynthesisError;
use agentforge_types::llm::{CompletionRequest, LlmError, Message, OutputConfig};

const SYSTEM_PROMPT: &str = "You are the Agent Forge code generator. \
Respond with the project as a JSON array of {\"filename\", \"content\"} objects and nothing else.";

/// Code synthesis collaborator driven by an LLM provider.
pub struct LlmCodeSynthesisClient {
    provider: BoxLlmProvider,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl LlmCodeSynthesisClient {
    pub fn new(provider: BoxLlmProvider, model: String, temperature: f64, max_tokens: u32) -> Self {
        Self {
            provider,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Build from the `[llm]` and `[forge]` config sections.
    pub fn from_settings(
        provider: BoxLlmProvider,
        llm: &LlmSettings,
        forge: &ForgeSettings,
    ) -> Self {
        Self::new(provider, llm.model.clone(), forge.temperature, forge.max_tokens)
    }

    fn completion_request(&self, request: &GenerationRequest) -> CompletionRequest {
        let output_config = self.provider.capabilities().structured_output.then(|| {
            OutputConfig::json_schema(request.schema.name.clone(), request.schema.schema.clone())
        });

        CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(request.prompt.clone())],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            stop_sequences: None,
            output_config,
        }
    }
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

fn map_llm_error(err: LlmError) -> SynthesisError {
    if err.is_capacity() {
        SynthesisError::RateLimited
    } else {
        SynthesisError::Failed(err.to_string())
    }
}

impl CodeSynthesisClient for LlmCodeSynthesisClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SynthesisError> {
        let completion = self.completion_request(request);
        tracing::info!(
            provider = self.provider.name(),
            model = %completion.model,
            bot_type = %request.details.bot_type,
            structured = completion.output_config.is_some(),
            "requesting project synthesis"
        );

        let response = self.provider.complete(&completion).await.map_err(|e| {
            tracing::warn!(error = %e, "project synthesis failed");
            map_llm_error(e)
        })?;

        tracing::debug!(
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "project synthesis returned"
        );

        Ok(strip_code_fences(&response.content).to_string())
    }
}
