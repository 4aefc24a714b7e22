//! OpenAI-style chat completions wire format (DeepSeek)
//!
//! `POST {base_url}/chat/completions` with bearer auth; the reply lives at
//! `choices[0].message.content`.

use super::{MAX_OUTPUT_TOKENS, ProviderError, TEMPERATURE};
use crate::config::ProviderConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub(crate) fn endpoint_url(config: &ProviderConfig) -> String {
    format!("{}/chat/completions", config.base_url())
}

pub(crate) fn build_request(
    http: &reqwest::Client,
    config: &ProviderConfig,
    api_key: &str,
    system_prompt: &str,
    user_message: &str,
) -> reqwest::RequestBuilder {
    let body = CompletionRequest {
        model: config.model(),
        messages: [
            Message {
                role: "system",
                content: system_prompt,
            },
            Message {
                role: "user",
                content: user_message,
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_OUTPUT_TOKENS,
    };

    http.post(endpoint_url(config))
        .bearer_auth(api_key)
        .json(&body)
}

pub(crate) fn extract_text(body: &str) -> Result<String, ProviderError> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::upstream(format!("malformed chat completion payload: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ProviderError::upstream("response contained no choices[0].message.content"))
}
