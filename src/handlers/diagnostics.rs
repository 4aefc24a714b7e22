//! Diagnostics endpoint handler
//!
//! Reports runtime and configuration state for operators. The API key itself
//! is never included; a short prefix is shown only when
//! `diagnostics.reveal_key_prefix` is set.

use crate::handlers::AppState;
use crate::handlers::health::connection_label;
use axum::{Json, extract::State};
use serde::Serialize;

/// Characters of the API key shown when prefix reveal is enabled
const KEY_PREFIX_CHARS: usize = 5;

/// Characters of the storage URI shown
const STORAGE_URI_PREFIX_CHARS: usize = 15;

/// Rust toolchain floor the binary is built against (`rust-version`)
const RUNTIME_VERSION: &str = concat!("rust>=", env!("CARGO_PKG_RUST_VERSION"));

const APP_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsResponse {
    pub runtime_version: &'static str,
    pub app_version: &'static str,
    pub environment: EnvironmentInfo,
    pub provider: ProviderInfo,
    pub storage: StorageInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub app_env: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub kind: &'static str,
    pub model: String,
    pub key_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub uri: String,
    pub connected: bool,
}

/// First `chars` characters of `value` followed by an ellipsis
fn masked(value: &str, chars: usize) -> String {
    let prefix: String = value.chars().take(chars).collect();
    format!("{}...", prefix)
}

/// GET /api/chat/debug handler
pub async fn handler(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let config = state.config();
    let provider = &config.provider;
    let api_key = provider.api_key();

    let key_prefix = if config.diagnostics.reveal_key_prefix {
        api_key.map(|key| masked(key, KEY_PREFIX_CHARS))
    } else {
        None
    };

    let connected = state.storage().is_connected().await;
    tracing::debug!(
        storage = connection_label(connected),
        key_exists = api_key.is_some(),
        "Serving diagnostics"
    );

    Json(DiagnosticsResponse {
        runtime_version: RUNTIME_VERSION,
        app_version: APP_VERSION,
        environment: EnvironmentInfo {
            app_env: config.server.environment.clone(),
            port: config.server.port,
        },
        provider: ProviderInfo {
            kind: provider.kind().as_str(),
            model: provider.model().to_string(),
            key_exists: api_key.is_some(),
            key_prefix,
        },
        storage: StorageInfo {
            uri: masked(&config.storage.uri, STORAGE_URI_PREFIX_CHARS),
            connected,
        },
    })
}
