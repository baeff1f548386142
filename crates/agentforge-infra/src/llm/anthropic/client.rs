//! AnthropicProvider -- concrete [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends non-streaming requests to the Anthropic Messages API (`/v1/messages`).
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use agentforge_core::llm::provider::LlmProvider;
use agentforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use super::types::{
    AnthropicErrorResponse, AnthropicMessage, AnthropicNonStreamResponse, AnthropicRequest,
};

/// Anthropic Claude LLM provider.
///
/// The API key is only exposed when building request headers.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";

    /// Create a new Anthropic provider.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Provider`] if the HTTP client cannot be built.
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        // Collaborator calls carry their own deadlines; this only guards a stuck socket.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let capabilities = Self::capabilities_for_model(&model);

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
            capabilities,
        })
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        if model.contains("opus") {
            ProviderCapabilities {
                structured_output: true,
                max_context_tokens: 200_000,
                max_output_tokens: 32_000,
            }
        } else if model.contains("sonnet") || model.contains("haiku") {
            ProviderCapabilities {
                structured_output: !model.contains("claude-3"),
                max_context_tokens: 200_000,
                max_output_tokens: 64_000,
            }
        } else {
            // Conservative defaults for unknown models
            ProviderCapabilities {
                structured_output: false,
                max_context_tokens: 200_000,
                max_output_tokens: 4_096,
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            stream: false,
            temperature: request.temperature,
            stop_sequences: request.stop_sequences.clone(),
            output_config: request.output_config.clone(),
        }
    }

    /// Map a non-2xx status and body to an [`LlmError`].
    fn error_for_status(status: reqwest::StatusCode, body: &str) -> LlmError {
        let message = serde_json::from_str::<AnthropicErrorResponse>(body)
            .map(|r| r.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            400 => LlmError::InvalidRequest(message),
            401 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited {
                retry_after_ms: None,
            },
            529 => LlmError::Overloaded(message),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

// AnthropicProvider intentionally does NOT derive Debug.

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        tracing::debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            structured = body.output_config.is_some(),
            "sending anthropic request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(status, &error_body));
        }

        let anthropic_resp: AnthropicNonStreamResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let content = anthropic_resp.text();

        let stop_reason = match anthropic_resp.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        tracing::debug!(
            input_tokens = anthropic_resp.usage.input_tokens,
            output_tokens = anthropic_resp.usage.output_tokens,
            %stop_reason,
            "anthropic response received"
        );

        Ok(CompletionResponse {
            id: anthropic_resp.id,
            content,
            model: anthropic_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: anthropic_resp.usage.input_tokens,
                output_tokens: anthropic_resp.usage.output_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentforge_types::llm::{Message, OutputConfig};

    fn make_provider() -> AnthropicProvider {
        AnthropicProvider::new(
            SecretString::from("test-key-not-real"),
            "claude-sonnet-4-20250514".to_string(),
        )
        .unwrap()
    }

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user("Hello")],
            system: Some("Be helpful".to_string()),
            max_tokens: 1024,
            temperature: Some(0.7),
            stop_sequences: None,
            output_config: Some(OutputConfig::json_schema(
                "project",
                serde_json::json!({"type": "array"}),
            )),
        }
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider().name(), "anthropic");
    }

    #[test]
    fn test_sonnet_capabilities() {
        let provider = make_provider();
        let caps = provider.capabilities();
        assert_eq!(caps.max_context_tokens, 200_000);
        assert!(caps.structured_output);
    }

    #[test]
    fn test_unknown_model_capabilities_are_conservative() {
        let provider =
            AnthropicProvider::new(SecretString::from("k"), "some-model".to_string()).unwrap();
        assert!(!provider.capabilities().structured_output);
        assert_eq!(provider.capabilities().max_output_tokens, 4_096);
    }

    #[test]
    fn test_to_anthropic_request_carries_output_config() {
        let provider = make_provider();
        let anthropic_req = provider.to_anthropic_request(&request("claude-sonnet-4-20250514"));
        assert_eq!(anthropic_req.model, "claude-sonnet-4-20250514");
        assert!(!anthropic_req.stream);
        assert_eq!(anthropic_req.messages.len(), 1);
        assert_eq!(anthropic_req.messages[0].role, "user");
        assert_eq!(anthropic_req.system.as_deref(), Some("Be helpful"));
        assert!(anthropic_req.output_config.is_some());
    }

    #[test]
    fn test_empty_model_falls_back_to_provider_default() {
        let provider = make_provider();
        let anthropic_req = provider.to_anthropic_request(&request(""));
        assert_eq!(anthropic_req.model, provider.model());
    }

    #[test]
    fn test_base_url_override() {
        let provider = make_provider().with_base_url("http://localhost:8080/".to_string());
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_error_status_mapping() {
        use reqwest::StatusCode;

        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert!(matches!(
            AnthropicProvider::error_for_status(StatusCode::from_u16(529).unwrap(), body),
            LlmError::Overloaded(ref m) if m == "Overloaded"
        ));
        assert!(matches!(
            AnthropicProvider::error_for_status(StatusCode::TOO_MANY_REQUESTS, ""),
            LlmError::RateLimited { .. }
        ));
        assert!(matches!(
            AnthropicProvider::error_for_status(StatusCode::UNAUTHORIZED, ""),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            AnthropicProvider::error_for_status(StatusCode::BAD_REQUEST, "bad"),
            LlmError::InvalidRequest(ref m) if m == "bad"
        ));
        assert!(matches!(
            AnthropicProvider::error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            LlmError::Provider { .. }
        ));
    }
}
