//! Integration tests for the `config` subcommand template and startup
//! configuration loading from files and environment

use portfolio_api::cli::generate_config_template;
use portfolio_api::config::{Config, ProviderKind};
use portfolio_api::error::AppError;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_generated_template_creates_valid_config_file() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, generate_config_template()).expect("Failed to write template");

    let config =
        Config::from_file(&config_path).expect("Generated template should load as valid Config");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.request_timeout_seconds, 20);
    assert_eq!(config.provider.kind(), ProviderKind::ChatCompletions);
    assert!(config.diagnostics.enabled);
    assert!(!config.diagnostics.reveal_key_prefix);
}

#[test]
fn test_template_leaves_key_unset() {
    let config: Config = generate_config_template().parse().unwrap();
    assert!(config.provider.api_key().is_none());
}

#[test]
fn test_env_overrides_template_values() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, generate_config_template()).unwrap();

    let config = Config::load(
        Some(config_path.as_path()),
        env(&[
            ("PORT", "8081"),
            ("AI_PROVIDER", "gemini"),
            ("GEMINI_API_KEY", "gm-key"),
            ("MONGODB_URI", "memory://"),
        ]),
    )
    .expect("env overrides should apply");

    assert_eq!(config.server.port, 8081);
    assert_eq!(config.provider.kind(), ProviderKind::Generative);
    assert_eq!(config.provider.api_key(), Some("gm-key"));
    assert_eq!(config.provider.model(), "gemini-1.5-flash");
    assert_eq!(config.storage.uri, "memory://");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = create_temp_dir();
    let missing = temp_dir.path().join("absent.toml");

    let err = Config::load(Some(missing.as_path()), env(&[])).unwrap_err();
    assert!(matches!(err, AppError::ConfigFileRead { .. }));
}

#[test]
fn test_invalid_file_reports_path() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[server]\nport = 0\n").unwrap();

    let err = Config::from_file(&config_path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("config.toml"), "{message}");
    assert!(message.contains("port"), "{message}");
}
