//! Chat endpoint handler
//!
//! Handles `POST /api/chat`: validates the message, runs the chat pipeline and
//! shapes the JSON reply. Provider failures never surface here as errors; they
//! come back as a degraded answer carrying a `note`.

use crate::chat::{self, FALLBACK_NOTE};
use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics::ChatMode;
use crate::middleware::RequestId;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat response to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    /// Present only when the fallback responder answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<chat::ChatResult> for ChatResponse {
    fn from(result: chat::ChatResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
            note: result.degraded.then(|| FALLBACK_NOTE.to_string()),
        }
    }
}

/// Whether the request declares a JSON body (`application/json` or `+json`)
fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// Decode the request body
///
/// A body that is blank or not declared as JSON carries no message and reads
/// as `Value::Null`. Only a declared JSON body that fails to parse is an error.
fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, AppError> {
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body).map_err(|e| AppError::ChatFailure {
        details: format!("Failed to parse the request body as JSON: {}", e),
    })
}

/// Pull a non-empty `message` string out of the request body
fn extract_message(body: &Value) -> Result<&str, AppError> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))
}

/// POST /api/chat handler
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let body = parse_body(&headers, &payload).inspect_err(|e| {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Unreadable chat request body"
        );
    })?;

    let message = extract_message(&body)?;

    tracing::debug!(
        request_id = %request_id,
        message_length = message.len(),
        "Received chat request"
    );

    let result = chat::respond(state.provider(), message, state.request_timeout()).await;

    let mode = if result.degraded {
        ChatMode::Fallback
    } else {
        ChatMode::Provider
    };
    if let Err(e) = state.metrics().record_chat(mode, result.fallback_reason) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    tracing::info!(
        request_id = %request_id,
        mode = mode.as_str(),
        fallback_reason = result.fallback_reason.map(|r| r.as_str()),
        response_length = result.message.len(),
        "Chat request completed"
    );

    Ok(Json(ChatResponse::from(result)))
}
