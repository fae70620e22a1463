// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client adapter for chat-completions style provider APIs.
//!
//! One [`HttpChatProvider`] instance serves one configured provider. Each
//! `complete` call performs exactly one request: retry and deadline policy
//! belong to the failover executor, which keeps a single point of retry
//! control across all adapters.

use std::time::Duration;

use async_trait::async_trait;
use parley_config::ProviderConfig;
use parley_core::{ConversationPayload, ParleyError, ProviderAdapter, Role};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse, WireMessage};

/// A provider adapter speaking the chat-completions wire schema over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpChatProvider {
    client: reqwest::Client,
    provider_id: String,
    base_url: String,
    model: String,
}

impl HttpChatProvider {
    /// Build an adapter from a provider config entry.
    ///
    /// Fails with a configuration error when no API key is set — an
    /// unconfigured provider should be filtered out before adapter
    /// construction, not discovered via 401s at request time.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ParleyError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            ParleyError::Config(format!(
                "provider `{}` has no API key configured",
                config.id
            ))
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            ParleyError::Config(format!(
                "invalid API key for provider `{}`: {e}",
                config.id
            ))
        })?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ParleyError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            provider_id: config.id.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn build_request(&self, payload: &ConversationPayload) -> ChatRequest {
        let mut messages = Vec::with_capacity(payload.turns.len() + 1);
        if let Some(system) = &payload.system {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(payload.turns.iter().map(|turn| WireMessage {
            role: match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            }
            .to_string(),
            content: turn.content.clone(),
        }));

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: payload.max_tokens,
        }
    }
}

#[async_trait]
impl ProviderAdapter for HttpChatProvider {
    fn id(&self) -> &str {
        &self.provider_id
    }

    async fn complete(&self, payload: &ConversationPayload) -> Result<String, ParleyError> {
        let request = self.build_request(payload);

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ParleyError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(provider_id = %self.provider_id, status = %status, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(ParleyError::Provider {
                message,
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| ParleyError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ParleyError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ParleyError::Provider {
                message: "malformed API response: empty choices array".to_string(),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::ChatTurn;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            id: "test".to_string(),
            display_name: "Test".to_string(),
            enabled: true,
            priority: 1,
            api_key: Some("sk-test-key".to_string()),
            base_url: format!("{base_url}/v1/chat/completions"),
            model: "test-model".to_string(),
            timeout_ms: 5_000,
            description: String::new(),
        }
    }

    fn test_payload() -> ConversationPayload {
        ConversationPayload {
            system: Some("You are a helpful mentor.".to_string()),
            turns: vec![ChatTurn {
                role: Role::User,
                content: "hi".to_string(),
            }],
            max_tokens: 128,
        }
    }

    fn success_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn from_config_requires_api_key() {
        let mut config = test_config("https://example.test");
        config.api_key = None;
        let err = HttpChatProvider::from_config(&config).expect_err("no key");
        assert!(err.to_string().contains("no API key configured"));
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hi there!")))
            .mount(&server)
            .await;

        let provider =
            HttpChatProvider::from_config(&test_config(&server.uri())).expect("valid config");
        let content = provider.complete(&test_payload()).await.expect("success");
        assert_eq!(content, "Hi there!");
    }

    #[tokio::test]
    async fn complete_sends_auth_header_and_system_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "You are a helpful mentor."},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let provider =
            HttpChatProvider::from_config(&test_config(&server.uri())).expect("valid config");
        let result = provider.complete(&test_payload()).await;
        assert!(result.is_ok(), "request should match: {result:?}");
    }

    #[tokio::test]
    async fn complete_maps_api_error_body() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"type": "rate_limit_error", "message": "Rate limited"}
        });
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .mount(&server)
            .await;

        let provider =
            HttpChatProvider::from_config(&test_config(&server.uri())).expect("valid config");
        let err = provider
            .complete(&test_payload())
            .await
            .expect_err("429 is an error");
        assert!(err.to_string().contains("rate_limit_error"), "got: {err}");
    }

    #[tokio::test]
    async fn complete_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            HttpChatProvider::from_config(&test_config(&server.uri())).expect("valid config");
        let _ = provider.complete(&test_payload()).await;
        // Mock expectation of exactly one request is verified on drop.
    }

    #[tokio::test]
    async fn empty_choices_is_a_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let provider =
            HttpChatProvider::from_config(&test_config(&server.uri())).expect("valid config");
        let err = provider
            .complete(&test_payload())
            .await
            .expect_err("empty choices");
        assert!(err.to_string().contains("empty choices"), "got: {err}");
    }
}
