//! AI client adapter
//!
//! Wraps one upstream text-generation provider behind a single contract:
//! system prompt and user message in, generated text out, or a
//! [`ProviderError`]. The wire protocol is picked by [`ProviderKind`]; each
//! variant keeps its request building and response parsing in its own module
//! so adding a provider never touches the chat handler.

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod chat_completions;
pub mod generative;

/// Sampling temperature sent with every request
pub const TEMPERATURE: f64 = 0.7;

/// Output length cap sent with every request
pub const MAX_OUTPUT_TOKENS: u32 = 500;

/// Longest slice of an upstream error body kept in error details
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Why the provider could not produce an answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No API key configured; no request was attempted
    #[error("AI provider API key is not configured")]
    NotConfigured,

    /// The single upstream attempt failed (transport, status, or payload)
    #[error("AI provider request failed: {detail}")]
    UpstreamFailure { detail: String },
}

impl ProviderError {
    pub fn upstream(detail: impl Into<String>) -> Self {
        ProviderError::UpstreamFailure {
            detail: detail.into(),
        }
    }
}

/// Uniform call contract for text-generation providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which wire protocol this provider speaks
    fn kind(&self) -> ProviderKind;

    /// Generate a reply to `user_message` under `system_prompt`
    ///
    /// Makes at most one upstream attempt. Never retries.
    async fn generate(&self, system_prompt: &str, user_message: &str)
    -> Result<String, ProviderError>;
}

/// HTTP-backed provider selected by [`ProviderConfig::kind`]
#[derive(Debug, Clone)]
pub struct HttpProvider {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl HttpProvider {
    /// Build a provider whose HTTP client gives up after `timeout`
    pub fn new(config: ProviderConfig, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ChatProvider for HttpProvider {
    fn kind(&self) -> ProviderKind {
        self.config.kind()
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ProviderError> {
        let Some(api_key) = self.config.api_key() else {
            return Err(ProviderError::NotConfigured);
        };

        let request = match self.config.kind() {
            ProviderKind::ChatCompletions => chat_completions::build_request(
                &self.http,
                &self.config,
                api_key,
                system_prompt,
                user_message,
            ),
            ProviderKind::Generative => generative::build_request(
                &self.http,
                &self.config,
                api_key,
                system_prompt,
                user_message,
            ),
        };

        tracing::debug!(
            provider = %self.config.kind(),
            model = %self.config.model(),
            message_length = user_message.len(),
            "Sending request to AI provider"
        );

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::upstream(format!("request timed out: {}", e))
            } else {
                ProviderError::upstream(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::upstream(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::upstream(format!(
                "HTTP {}: {}",
                status,
                truncate(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        match self.config.kind() {
            ProviderKind::ChatCompletions => chat_completions::extract_text(&body),
            ProviderKind::Generative => generative::extract_text(&body),
        }
    }
}

/// Char-boundary-safe truncation for log and error text
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
