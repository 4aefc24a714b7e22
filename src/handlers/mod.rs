//! HTTP request handlers for the portfolio API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::provider::{ChatProvider, HttpProvider};
use crate::storage::Storage;
use std::sync::Arc;
use std::time::Duration;

pub mod chat;
pub mod contact;
pub mod diagnostics;
pub mod health;
pub mod metrics;
pub mod projects;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers. Nothing in
/// here is mutated per request except the storage backend, which does its
/// own locking.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    provider: Arc<dyn ChatProvider>,
    storage: Arc<dyn Storage>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create state with the HTTP provider described by `config`
    pub fn new(config: Arc<Config>, storage: Arc<dyn Storage>) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.server.request_timeout_seconds);
        let provider = HttpProvider::new(config.provider.clone(), timeout)?;
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to create metrics registry: {}", e)))?;

        Ok(Self::from_parts(
            config,
            Arc::new(provider),
            storage,
            Arc::new(metrics),
        ))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        config: Arc<Config>,
        provider: Arc<dyn ChatProvider>,
        storage: Arc<dyn Storage>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            provider,
            storage,
            metrics,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &dyn ChatProvider {
        self.provider.as_ref()
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Bound on the upstream provider call
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.request_timeout_seconds)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appstate_new_creates_state() {
        let state = test_support::fallback_only_state();
        assert_eq!(state.config().server.port, 5000);
        assert_eq!(state.request_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = test_support::fallback_only_state();
        let state2 = state.clone();
        assert!(Arc::ptr_eq(&state.metrics, &state2.metrics));
    }
}
