//! Command-line interface for the portfolio API
//!
//! Provides argument parsing and subcommand handling for the server binary.

use clap::{Parser, Subcommand};

/// Backend for a personal portfolio site
#[derive(Parser)]
#[command(name = "portfolio-api")]
#[command(version)]
#[command(about = "Backend for a personal portfolio site")]
#[command(
    long_about = "Serves the portfolio chat assistant, contact form, project listing \
    and health endpoints. Chat questions go to a hosted AI provider and fall back to \
    canned answers when the provider is unavailable."
)]
pub struct Cli {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Portfolio API Configuration
# ===========================
#
# Every value below is optional and shows the built-in default. Environment
# variables (PORT, HOST, APP_ENV, AI_PROVIDER, DEEPSEEK_API_KEY, GEMINI_API_KEY,
# AI_API_KEY, AI_BASE_URL, AI_MODEL, STORAGE_URI, LOG_LEVEL) override this file.

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 5000

# Upper bound in seconds on a single AI provider call
request_timeout_seconds = 20

# Reported by the diagnostics endpoint
environment = "development"

# Allowed browser origins; an empty list allows any origin
cors_origins = []

[provider]
# "chat_completions" (DeepSeek-style) or "generative" (Gemini-style)
kind = "chat_completions"

# Keep API keys out of this file; set DEEPSEEK_API_KEY, GEMINI_API_KEY or
# AI_API_KEY instead. Without a key every chat answer comes from the fallback.

# Defaults depend on the provider kind
# base_url = "https://api.deepseek.com/v1"
# model = "deepseek-chat"

[storage]
# "memory://" keeps data for the life of the process,
# "file://<directory>" persists contacts and projects on disk
uri = "file://data"

[diagnostics]
# Mount GET /api/chat/debug and /api/debug
enabled = true

# Include the first characters of the API key in the diagnostics report
reveal_key_prefix = false

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}
