//! OpenAI chat-completions client.
//!
//! A thin wrapper over the `/chat/completions` endpoint: bearer auth, JSON
//! body with model/messages/temperature, and a retry loop with exponential
//! backoff for transport failures, 429s and 5xx responses. Client errors
//! (4xx) are surfaced immediately as critical.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::RuntimeEnv;
use crate::llm::cache::ResponseCache;
use crate::llm::{call_with_retries, ChatMessage, CompletionModel, RetryPolicy};
use crate::utilities::errors::PipelineError;
use crate::utilities::rpm_controller::RpmController;

/// Default API root when no base URL override is configured.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI completion backend.
pub struct OpenAiCompletion {
    model: String,
    api_key: String,
    base_url: Option<String>,
    timeout_secs: u64,
    retry: RetryPolicy,
    rpm: RpmController,
    cache: Option<ResponseCache>,
}

impl std::fmt::Debug for OpenAiCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletion")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_rpm", &self.rpm.max_rpm)
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl OpenAiCompletion {
    /// Create a client for `model` with the given API key.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: 120,
            retry: RetryPolicy::default(),
            rpm: RpmController::new(None),
            cache: None,
        }
    }

    /// Build a client from the resolved environment and retry settings.
    pub fn from_env(
        model: impl Into<String>,
        env: &RuntimeEnv,
        retry: RetryPolicy,
        timeout_secs: u64,
    ) -> Result<Self, PipelineError> {
        let mut client = Self::new(model, env.require_api_key()?);
        client.base_url = env.base_url.clone();
        client.timeout_secs = timeout_secs;
        client.retry = retry;
        client.rpm = RpmController::new(env.max_rpm);
        if env.cache_enabled {
            client.cache = Some(ResponseCache::new());
        }
        Ok(client)
    }

    /// Override the API root (e.g. for a proxy or a compatible server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable response caching.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(ResponseCache::new());
        self
    }

    /// The API root in use.
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Assemble the request body for one completion.
    fn build_request_body(&self, messages: &[ChatMessage], temperature: f64) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
        })
    }

    /// Pull the assistant text out of a completions response.
    fn parse_response_body(&self, response: &Value) -> Result<String, PipelineError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| PipelineError::Api("no choices in completion response".into()))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| PipelineError::Api("completion message has no content".into()))?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        Ok(content.to_string())
    }

    /// One HTTP attempt, classified into retryable and terminal errors.
    async fn single_attempt(
        &self,
        client: &reqwest::Client,
        endpoint: &str,
        body: &Value,
    ) -> Result<String, PipelineError> {
        self.rpm.check_or_wait().await;

        let response = client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PipelineError::Transport("rate limited (429)".into()));
        }
        if status.is_server_error() {
            return Err(PipelineError::Transport(format!("server error: {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        if status.is_client_error() {
            return Err(PipelineError::Api(format!("{}: {}", status, text)));
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| {
            let excerpt: String = text.chars().take(500).collect();
            PipelineError::Api(format!("invalid JSON from API: {} - body: {}", e, excerpt))
        })?;

        self.parse_response_body(&json)
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<String, PipelineError> {
        let cache_key = self
            .cache
            .as_ref()
            .map(|_| ResponseCache::key_for(&self.model, temperature, messages));

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(hit) = cache.read(key) {
                log::debug!("cache hit for completion {}", key);
                return Ok(hit);
            }
        }

        log::debug!(
            "completion request: model={}, temperature={}, messages={}",
            self.model,
            temperature,
            messages.len()
        );

        let body = self.build_request_body(messages, temperature);
        let endpoint = format!("{}/chat/completions", self.api_base_url());
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        let text = call_with_retries(&self.retry, || {
            self.single_attempt(&client, &endpoint, &body)
        })
        .await?;

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            cache.add(key, &text);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiCompletion {
        OpenAiCompletion::new("gpt-4o", "sk-test")
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(client().api_base_url(), "https://api.openai.com/v1");
        assert_eq!(
            client().with_base_url("http://localhost:11434/v1").api_base_url(),
            "http://localhost:11434/v1"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hello")];
        let body = client().build_request_body(&messages, 0.8);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.8);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_parse_response_body() {
        let response = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"ok\": true}"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let content = client().parse_response_body(&response).unwrap();
        assert_eq!(content, "{\"ok\": true}");
    }

    #[test]
    fn test_parse_response_without_choices_is_api_error() {
        let err = client()
            .parse_response_body(&serde_json::json!({"error": "nope"}))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Api(_)));
        assert!(err.is_critical());
    }

    #[test]
    fn test_from_env_requires_api_key() {
        let env = RuntimeEnv::default();
        let err = OpenAiCompletion::from_env("gpt-4o", &env, RetryPolicy::default(), 30)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::MissingApiKey));
    }

    #[test]
    fn test_from_env_applies_overrides() {
        let env = RuntimeEnv {
            api_key: Some("sk-test".into()),
            base_url: Some("http://proxy/v1".into()),
            max_rpm: Some(30),
            cache_enabled: true,
            ..Default::default()
        };
        let client = OpenAiCompletion::from_env("gpt-4o", &env, RetryPolicy::default(), 45).unwrap();

        assert_eq!(client.api_base_url(), "http://proxy/v1");
        assert_eq!(client.timeout_secs, 45);
        assert_eq!(client.rpm.max_rpm, Some(30));
        assert!(client.cache.is_some());
    }
}
