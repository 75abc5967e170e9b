// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.

use std::time::Duration;

use helpdesk_core::HelpdeskError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// Authenticated client bound to one base URL.
///
/// Transient statuses (429, 500, 502, 503) are retried up to `max_retries`
/// times with a one second pause. With `max_retries == 0` every call is
/// single-shot.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    max_retries: u32,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, HelpdeskError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            HelpdeskError::Config(format!("invalid API key header value: {e}"))
        })?;
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| HelpdeskError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            timeout,
            max_retries,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a non-streaming completion request.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HelpdeskError> {
        let mut req = request.clone();
        req.stream = false;

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&req)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| HelpdeskError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| HelpdeskError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(HelpdeskError::provider(format!(
                    "API returned {status}: {body}"
                )));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => match api_err.error.type_ {
                    Some(kind) => format!("API error {status} ({kind}): {}", api_err.error.message),
                    None => format!("API error {status}: {}", api_err.error.message),
                },
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(HelpdeskError::provider(message));
        }

        Err(last_error
            .unwrap_or_else(|| HelpdeskError::provider("completion request failed after retries")))
    }

    fn transport_error(&self, e: reqwest::Error) -> HelpdeskError {
        if e.is_timeout() {
            return HelpdeskError::Timeout {
                duration: self.timeout,
            };
        }
        HelpdeskError::Provider {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str, max_retries: u32) -> OpenAiClient {
        OpenAiClient::new("nvapi-test", base_url, Duration::from_secs(5), max_retries).unwrap()
    }

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "meta/llama-3.1-8b-instruct".into(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: Some("Hello".into()),
            }],
            temperature: 0.3,
            max_tokens: 300,
            stream: true,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "meta/llama-3.1-8b-instruct",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4}
        })
    }

    #[test]
    fn endpoint_joins_base_url() {
        let c = client("https://integrate.api.nvidia.com/v1/", 0);
        assert_eq!(
            c.endpoint(),
            "https://integrate.api.nvidia.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn sends_bearer_auth_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer nvapi-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hi!")))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client(&server.uri(), 0).complete(&request()).await.unwrap();
        assert_eq!(resp.id, "chatcmpl-1");
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hi!"));
        assert_eq!(resp.usage.unwrap().completion_tokens, 4);
    }

    #[tokio::test]
    async fn single_shot_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server.uri(), 0)
            .complete(&request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"), "got: {err}");
    }

    #[tokio::test]
    async fn retries_transient_status_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("later")))
            .mount(&server)
            .await;

        let resp = client(&server.uri(), 1).complete(&request()).await.unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("later"));
    }

    #[tokio::test]
    async fn api_error_envelope_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "invalid key", "type": "authentication_error"}
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri(), 3)
            .complete(&request())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("authentication_error"), "got: {msg}");
        assert!(msg.contains("invalid key"), "got: {msg}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server.uri(), 0)
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, HelpdeskError::Provider { .. }));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let c = OpenAiClient::new("k", &server.uri(), Duration::from_millis(50), 0).unwrap();
        let err = c.complete(&request()).await.unwrap_err();
        assert!(matches!(err, HelpdeskError::Timeout { .. }), "got: {err}");
    }
}
