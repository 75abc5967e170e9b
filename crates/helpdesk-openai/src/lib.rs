// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions provider.
//!
//! Implements [`ProviderAdapter`] over any endpoint speaking the
//! `/chat/completions` protocol (NVIDIA NIM by default). Only single-shot,
//! non-streaming completions are needed by triage and chat.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use helpdesk_config::model::LlmConfig;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::traits::{PluginAdapter, ProviderAdapter};
use helpdesk_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, TokenUsage,
};
use tracing::{debug, info, warn};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Environment variable consulted when `llm.api_key` is unset.
pub const API_KEY_ENV: &str = "NVIDIA_API_KEY";

/// Chat-completions provider.
///
/// Without an API key the provider still constructs, but every call fails
/// with a configuration error so callers take their fallback path.
pub struct OpenAiProvider {
    client: Option<OpenAiClient>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, HelpdeskError> {
        let client = match resolve_api_key(&config.api_key) {
            Some(key) => Some(OpenAiClient::new(
                &key,
                &config.base_url,
                Duration::from_secs(config.timeout_secs),
                config.max_retries,
            )?),
            None => {
                warn!("no LLM API key configured; triage and chat will use fallbacks");
                None
            }
        };

        info!(model = %config.model, base_url = %config.base_url, "LLM provider initialized");
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    fn to_api_request(&self, request: CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.unwrap_or_else(|| self.model.clone()),
            messages: request
                .messages
                .into_iter()
                .map(|m| ApiMessage {
                    role: m.role,
                    content: Some(m.content),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        // No probe call: completions are billed.
        Ok(match self.client {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Degraded("API key not configured".into()),
        })
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        debug!("LLM provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HelpdeskError> {
        let Some(client) = &self.client else {
            return Err(HelpdeskError::Config(format!(
                "LLM API key not found. Set llm.api_key in config or {API_KEY_ENV}."
            )));
        };

        let response = client.complete(&self.to_api_request(request)).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| HelpdeskError::provider("response contained no choices"))?;
        let usage = response.usage.unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            model: response.model,
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            },
        })
    }
}

/// Config key first, then [`API_KEY_ENV`]. Empty strings count as unset.
fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Some(key.clone());
    }
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}
