//! Prometheus metrics collection for the portfolio API
//!
//! This module provides metrics instrumentation for tracking:
//! - Chat requests by answering mode (provider or fallback)
//! - Fallback activations by reason
//! - Contact form submissions by outcome
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.
//! Label values come from closed enums so series cardinality stays fixed.

use crate::chat::FallbackReason;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// How a chat request was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Provider,
    Fallback,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Provider => "provider",
            ChatMode::Fallback => "fallback",
        }
    }
}

/// Result of a contact form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Stored,
    Invalid,
    Failed,
}

impl ContactOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactOutcome::Stored => "stored",
            ContactOutcome::Invalid => "invalid",
            ContactOutcome::Failed => "failed",
        }
    }
}

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    chat_requests: IntCounterVec,
    chat_fallbacks: IntCounterVec,
    contact_submissions: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let chat_requests = IntCounterVec::new(
            Opts::new(
                "portfolio_chat_requests_total",
                "Total chat requests answered, by answering mode",
            ),
            &["mode"],
        )?;

        let chat_fallbacks = IntCounterVec::new(
            Opts::new(
                "portfolio_chat_fallbacks_total",
                "Chat requests answered by the fallback responder, by reason",
            ),
            &["reason"],
        )?;

        let contact_submissions = IntCounterVec::new(
            Opts::new(
                "portfolio_contact_submissions_total",
                "Contact form submissions by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(chat_requests.clone()))?;
        registry.register(Box::new(chat_fallbacks.clone()))?;
        registry.register(Box::new(contact_submissions.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            chat_requests,
            chat_fallbacks,
            contact_submissions,
        })
    }

    /// Record an answered chat request
    pub fn record_chat(
        &self,
        mode: ChatMode,
        reason: Option<FallbackReason>,
    ) -> Result<(), prometheus::Error> {
        self.chat_requests
            .get_metric_with_label_values(&[mode.as_str()])?
            .inc();
        if let Some(reason) = reason {
            self.chat_fallbacks
                .get_metric_with_label_values(&[reason.as_str()])?
                .inc();
        }
        Ok(())
    }

    /// Record a contact form submission
    pub fn record_contact(&self, outcome: ContactOutcome) -> Result<(), prometheus::Error> {
        self.contact_submissions
            .get_metric_with_label_values(&[outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Current chat request count for `mode`
    pub fn chat_count(&self, mode: ChatMode) -> u64 {
        self.chat_requests
            .get_metric_with_label_values(&[mode.as_str()])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }

    /// Current contact submission count for `outcome`
    pub fn contact_count(&self, outcome: ContactOutcome) -> u64 {
        self.contact_submissions
            .get_metric_with_label_values(&[outcome.as_str()])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        tracing::debug!(
            metric_family_count = metric_families.len(),
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}
