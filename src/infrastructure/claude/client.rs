use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use super::retry::RetryPolicy;
use super::types::{MessageRequest, MessageResponse};
use crate::domain::models::LlmConfig;
use crate::domain::ports::{GenerationError, TextGenerator};

/// Environment variable consulted when no key is configured
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// [`TextGenerator`] backed by the Anthropic Messages API
///
/// Single-turn prompts with exponential-backoff retries on transient
/// failures. The request timeout comes from configuration; the question
/// generator applies its own overall bound on top.
pub struct AnthropicTextGenerator {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    retry_policy: RetryPolicy,
}

impl AnthropicTextGenerator {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            retry_policy: RetryPolicy::from_config(config),
        })
    }

    /// Configured key, else `ANTHROPIC_API_KEY`. Blank values count as unset.
    pub fn resolve_api_key(config: &LlmConfig) -> Option<String> {
        config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    async fn send_request(&self, request: &MessageRequest) -> Result<MessageResponse, GenerationError> {
        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                GenerationError::RateLimited(body)
            } else {
                GenerationError::Http {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl TextGenerator for AnthropicTextGenerator {
    #[instrument(skip_all, fields(max_tokens = max_tokens))]
    async fn invoke(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let request = MessageRequest::user_prompt(&self.model, prompt, max_tokens, temperature);

        let response = self
            .retry_policy
            .execute(|| self.send_request(&request))
            .await?;

        debug!(
            model = %self.model,
            message_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generation complete"
        );

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GenerationError::InvalidResponse(
                "response contained no text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn config(base_url: String) -> LlmConfig {
        LlmConfig {
            base_url,
            model: "claude-test".to_string(),
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            ..LlmConfig::default()
        }
    }

    fn body(text: &str) -> String {
        serde_json::json!({
            "id": "msg_01ABC123",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": "claude-test",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_invoke_returns_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-api-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "claude-test",
                "max_tokens": 200
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body("[\"Any risks today?\"]"))
            .create_async()
            .await;

        let generator = AnthropicTextGenerator::new(&config(server.url()), "test-api-key").unwrap();
        let text = generator.invoke("prompt", 200, 0.7).await.unwrap();

        assert_eq!(text, "[\"Any risks today?\"]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let generator = AnthropicTextGenerator::new(&config(server.url()), "k").unwrap();
        let err = generator.invoke("prompt", 10, 0.0).await.unwrap_err();

        assert!(matches!(err, GenerationError::Http { status: 529, .. }));
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let mut cfg = config(server.url());
        cfg.max_retries = 0;
        let generator = AnthropicTextGenerator::new(&cfg, "k").unwrap();

        let err = generator.invoke("prompt", 10, 0.0).await.unwrap_err();
        assert!(matches!(err, GenerationError::RateLimited(body) if body == "slow down"));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body("invalid x-api-key")
            .expect(1)
            .create_async()
            .await;

        let generator = AnthropicTextGenerator::new(&config(server.url()), "bad").unwrap();
        let err = generator.invoke("prompt", 10, 0.0).await.unwrap_err();

        assert!(matches!(err, GenerationError::Http { status: 401, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(body("   "))
            .create_async()
            .await;

        let generator = AnthropicTextGenerator::new(&config(server.url()), "k").unwrap();
        let err = generator.invoke("prompt", 10, 0.0).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }

    #[test]
    fn test_resolve_api_key() {
        let mut cfg = LlmConfig::default();
        temp_env::with_var(API_KEY_ENV, Some("from-env"), || {
            assert_eq!(
                AnthropicTextGenerator::resolve_api_key(&cfg).as_deref(),
                Some("from-env")
            );
        });

        cfg.api_key = Some("from-config".to_string());
        temp_env::with_var(API_KEY_ENV, Some("from-env"), || {
            assert_eq!(
                AnthropicTextGenerator::resolve_api_key(&cfg).as_deref(),
                Some("from-config")
            );
        });

        cfg.api_key = Some("  ".to_string());
        temp_env::with_var_unset(API_KEY_ENV, || {
            assert!(AnthropicTextGenerator::resolve_api_key(&cfg).is_none());
        });
    }
}
