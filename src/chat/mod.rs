//! Chat request pipeline
//!
//! Dispatches a validated message to the AI provider and degrades to the
//! fallback responder on any provider error, so a usable answer is always
//! produced. HTTP concerns live in `handlers::chat`.

use crate::provider::{ChatProvider, ProviderError};
use serde::Serialize;
use std::time::Duration;

pub mod fallback;
pub mod prompt;

pub use fallback::{Topic, classify, fallback_answer};
pub use prompt::build_system_prompt;

/// Note attached to responses served from the fallback responder
pub const FALLBACK_NOTE: &str = "fallback used";

/// Why the fallback responder answered instead of the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NotConfigured,
    UpstreamFailure,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NotConfigured => "not_configured",
            FallbackReason::UpstreamFailure => "upstream_failure",
        }
    }
}

impl From<&ProviderError> for FallbackReason {
    fn from(error: &ProviderError) -> Self {
        match error {
            ProviderError::NotConfigured => FallbackReason::NotConfigured,
            ProviderError::UpstreamFailure { .. } => FallbackReason::UpstreamFailure,
        }
    }
}

/// Outcome of one chat exchange
///
/// `degraded` is true exactly when the fallback responder produced `message`;
/// `detail` then carries the provider error for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    pub success: bool,
    pub message: String,
    pub degraded: bool,
    pub detail: Option<String>,
    pub fallback_reason: Option<FallbackReason>,
}

impl ChatResult {
    fn answered(message: String) -> Self {
        Self {
            success: true,
            message,
            degraded: false,
            detail: None,
            fallback_reason: None,
        }
    }

    fn degraded(message: &str, error: &ProviderError) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            degraded: true,
            detail: Some(error.to_string()),
            fallback_reason: Some(FallbackReason::from(error)),
        }
    }
}

/// Answer `message`, preferring the provider and degrading to the fallback
///
/// The provider call is the only suspension point and is bounded by
/// `timeout`; an elapsed timeout counts as an upstream failure.
pub async fn respond(provider: &dyn ChatProvider, message: &str, timeout: Duration) -> ChatResult {
    let outcome = match tokio::time::timeout(
        timeout,
        provider.generate(build_system_prompt(), message),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(ProviderError::upstream(format!(
            "provider call timed out after {} ms",
            timeout.as_millis()
        ))),
    };

    match outcome {
        Ok(text) => ChatResult::answered(text),
        Err(error) => {
            let topic = classify(message);
            match &error {
                ProviderError::NotConfigured => tracing::debug!(
                    provider = %provider.kind(),
                    topic = topic.as_str(),
                    "No provider key configured, answering from fallback"
                ),
                ProviderError::UpstreamFailure { detail } => tracing::warn!(
                    provider = %provider.kind(),
                    topic = topic.as_str(),
                    error = %detail,
                    "AI provider failed, answering from fallback"
                ),
            }
            ChatResult::degraded(topic.answer(), &error)
        }
    }
}
