//! Configuration management for the portfolio API
//!
//! Settings come from three layers, lowest precedence first: built-in
//! defaults, an optional TOML file, and environment variables. Everything is
//! resolved once at startup into a [`Config`] that is handed to the components
//! that need it; nothing reads the process environment after that.

use crate::error::{AppError, AppResult};
use crate::storage::StorageLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Upper bound for the upstream call timeout
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bound on the single outbound provider call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Deployment label reported by the diagnostics endpoint
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            environment: default_environment(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    20
}

fn default_environment() -> String {
    "development".to_string()
}

/// Which upstream wire protocol the AI client adapter speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-style `/chat/completions` (DeepSeek)
    #[default]
    #[serde(alias = "deepseek")]
    ChatCompletions,
    /// Gemini-style `:generateContent`
    #[serde(alias = "gemini")]
    Generative,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::ChatCompletions => "chat_completions",
            ProviderKind::Generative => "generative",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::ChatCompletions => "https://api.deepseek.com/v1",
            ProviderKind::Generative => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::ChatCompletions => "deepseek-chat",
            ProviderKind::Generative => "gemini-1.5-flash",
        }
    }

    /// Provider-specific environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::ChatCompletions => "DEEPSEEK_API_KEY",
            ProviderKind::Generative => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat_completions" | "deepseek" => Ok(ProviderKind::ChatCompletions),
            "generative" | "gemini" => Ok(ProviderKind::Generative),
            other => Err(AppError::Config(format!(
                "unknown AI provider '{}', expected one of: chat_completions, deepseek, generative, gemini",
                other
            ))),
        }
    }
}

/// Upstream text-generation provider settings
///
/// A missing API key is a valid state: the chat endpoint then answers every
/// request from the fallback responder without touching the network.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    kind: ProviderKind,
    #[serde(default, skip_serializing)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, api_key: Option<String>) -> Self {
        Self {
            kind,
            api_key,
            base_url: None,
            model: None,
        }
    }

    /// Override the provider base URL (e.g. to point at a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// API key, if one is configured and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
            .trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }
}

/// Persistence settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// `memory://` or `file://<directory>`
    #[serde(default = "default_storage_uri")]
    pub uri: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uri: default_storage_uri(),
        }
    }
}

fn default_storage_uri() -> String {
    "file://data".to_string()
}

/// Diagnostics endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Include the first characters of the provider key in the report
    #[serde(default)]
    pub reveal_key_prefix: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reveal_key_prefix: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Resolve the full startup configuration
    ///
    /// An explicitly requested file must exist. The default `config.toml` is
    /// optional; when it is absent the built-in defaults are used. Environment
    /// overrides are applied on top, then the result is validated.
    pub fn load<F>(explicit_path: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => {
                tracing::debug!("No config file found, using built-in defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-variable overrides through `lookup`
    ///
    /// Taking the lookup as a closure keeps this testable without mutating
    /// the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!("PORT must be a valid port number, got '{}'", port))
            })?;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(environment) = get("APP_ENV") {
            self.server.environment = environment;
        }

        if let Some(kind) = get("AI_PROVIDER") {
            self.provider.kind = kind.parse()?;
        }
        if let Some(key) = get("AI_API_KEY").or_else(|| get(self.provider.kind.api_key_env())) {
            self.provider.api_key = Some(key);
        }
        if let Some(base_url) = get("AI_BASE_URL") {
            self.provider.base_url = Some(base_url);
        }
        if let Some(model) = get("AI_MODEL") {
            self.provider.model = Some(model);
        }

        if let Some(uri) = get("STORAGE_URI").or_else(|| get("MONGODB_URI")) {
            self.storage.uri = uri;
        }

        if let Some(level) = get("LOG_LEVEL") {
            self.observability.log_level = level;
        }

        Ok(())
    }

    /// Validate configuration after parsing
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(AppError::Config(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "server.request_timeout_seconds cannot exceed {} seconds, got {}",
                MAX_TIMEOUT_SECONDS, self.server.request_timeout_seconds
            )));
        }

        let base_url = self.provider.base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "provider.base_url '{}' must start with 'http://' or 'https://'",
                base_url
            )));
        }

        if self.provider.model().trim().is_empty() {
            return Err(AppError::Config(
                "provider.model cannot be empty".to_string(),
            ));
        }

        StorageLocation::parse(&self.storage.uri)?;

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
