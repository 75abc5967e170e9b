// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted language-model provider.
//!
//! Replies are popped from a FIFO queue; an empty queue answers
//! `"mock response"`. Every request is recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helpdesk_core::traits::{PluginAdapter, ProviderAdapter};
use helpdesk_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, TokenUsage,
};
use helpdesk_core::HelpdeskError;

pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    failure: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// A provider whose every call fails with a provider error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(text.into());
    }

    /// Shared handle to every request received so far.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HelpdeskError> {
        let model = request.model.clone().unwrap_or_else(|| "mock-model".into());
        self.requests.lock().unwrap().push(request);

        if let Some(message) = &self.failure {
            return Err(HelpdeskError::provider(message.clone()));
        }

        let content = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string());
        Ok(CompletionResponse {
            id: format!("mock-{}", uuid::Uuid::new_v4()),
            model,
            content,
            finish_reason: Some("stop".into()),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::types::ChatMessage;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: None,
            messages: vec![ChatMessage::user("hi")],
            temperature: 0.0,
            max_tokens: 10,
        }
    }

    #[tokio::test]
    async fn replies_in_order_then_default() {
        let provider = MockProvider::with_responses(vec!["one".into()]);
        provider.add_response("two");
        assert_eq!(provider.complete(request()).await.unwrap().content, "one");
        assert_eq!(provider.complete(request()).await.unwrap().content, "two");
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            "mock response"
        );
        assert_eq!(provider.request_count(), 3);
    }

    #[tokio::test]
    async fn failing_provider_still_records() {
        let provider = MockProvider::failing("boom");
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(provider.request_count(), 1);
    }
}
