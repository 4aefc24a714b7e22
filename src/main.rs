//! Portfolio API HTTP server
//!
//! Starts an Axum web server for the portfolio chat assistant, contact form and
//! project listing.

use clap::Parser;
use portfolio_api::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::AppState,
    server, storage,
    storage::StorageLocation,
    telemetry,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                eprintln!("Configuration template written to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // A missing .env file is normal outside local development
    dotenvy::dotenv().ok();

    let config = Config::load(cli.config.as_deref().map(Path::new), |key| {
        std::env::var(key).ok()
    })?;

    telemetry::init(&config.observability.log_level);

    tracing::info!(
        environment = %config.server.environment,
        "Starting portfolio API on {}:{}",
        config.server.host,
        config.server.port
    );

    let location = StorageLocation::parse(&config.storage.uri)?;
    let storage = storage::connect(&location).await;

    if config.provider.api_key().is_some() {
        tracing::info!(
            provider = %config.provider.kind(),
            model = config.provider.model(),
            "AI provider configured"
        );
    } else {
        tracing::warn!(
            provider = %config.provider.kind(),
            "No AI provider API key set, chat will answer from the fallback responder"
        );
    }

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = AppState::new(Arc::new(config), storage)?;
    let app = server::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check available at http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
