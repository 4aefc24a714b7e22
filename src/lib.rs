//! Portfolio API - backend for a personal portfolio site
//!
//! This library serves an AI chat assistant that degrades to canned answers
//! when the upstream provider is missing or failing, a validated contact form
//! backed by pluggable storage, a project listing and health reporting.

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod provider;
pub mod server;
pub mod storage;
pub mod telemetry;
