//! Gemini-style generateContent wire format
//!
//! `POST {base_url}/models/{model}:generateContent` authenticated with the
//! `x-goog-api-key` header. The reply is the text of the first candidate's
//! parts, concatenated.

use super::{MAX_OUTPUT_TOKENS, ProviderError, TEMPERATURE};
use crate::config::ProviderConfig;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub(crate) fn endpoint_url(config: &ProviderConfig) -> String {
    format!(
        "{}/models/{}:generateContent",
        config.base_url(),
        config.model()
    )
}

pub(crate) fn build_request(
    http: &reqwest::Client,
    config: &ProviderConfig,
    api_key: &str,
    system_prompt: &str,
    user_message: &str,
) -> reqwest::RequestBuilder {
    let body = GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: [Part {
                text: system_prompt,
            }],
        },
        contents: [Content {
            role: Some("user"),
            parts: [Part { text: user_message }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    };

    http.post(endpoint_url(config))
        .header(API_KEY_HEADER, api_key)
        .json(&body)
}

pub(crate) fn extract_text(body: &str) -> Result<String, ProviderError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::upstream(format!("malformed generateContent payload: {}", e))
    })?;

    let candidate = parsed
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| ProviderError::upstream("response contained no candidates"))?;

    let text: String = candidate
        .content
        .and_then(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(ProviderError::upstream(
            "first candidate contained no text parts",
        ));
    }
    Ok(text)
}
