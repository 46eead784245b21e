//! Completion model abstraction.
//!
//! The pipeline talks to the hosted model through the [`CompletionModel`]
//! trait so tests can substitute a scripted model and verify retry counts
//! and error classification without network access.

pub mod cache;
pub mod openai;

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::errors::PipelineError;

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// A text-completion backend.
#[async_trait]
pub trait CompletionModel: Send + Sync + std::fmt::Debug {
    /// The model identifier (e.g. "gpt-4o").
    fn model(&self) -> &str;

    /// Run one completion and return the assistant's text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<String, PipelineError>;
}

/// Retry settings for a model call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries on top of the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Run `op` until it succeeds, a non-retryable error occurs, or the policy
/// is exhausted. Only [`PipelineError::is_retryable`] errors are retried.
pub async fn call_with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, PipelineError>>,
{
    let mut delay = policy.initial_delay;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            log::warn!("completion retry attempt {} after {:?}", attempt, delay);
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                log::warn!("completion attempt {} failed: {}", attempt + 1, e);
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("retry loop returns on the final attempt")
}

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("fenced JSON pattern is valid")
});

/// Pull a JSON value out of a model response.
///
/// Models frequently wrap JSON in markdown fences or surround it with prose;
/// this tries the fenced block first, then the whole trimmed response, then
/// the outermost brace span.
pub fn extract_json(response: &str) -> Result<Value, PipelineError> {
    if let Some(caps) = FENCED_JSON.captures(response) {
        let inner = caps[1].trim();
        if let Ok(value) = serde_json::from_str(inner) {
            return Ok(value);
        }
    }

    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&response[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(PipelineError::ResponseParse(format!(
        "no JSON found in response ({} chars)",
        response.len()
    )))
}

/// Extract and deserialize a model response into a typed record.
pub fn parse_response<T: DeserializeOwned>(response: &str) -> Result<T, PipelineError> {
    let value = extract_json(response)?;
    serde_json::from_value(value).map_err(|e| PipelineError::ResponseParse(e.to_string()))
}
