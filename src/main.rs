//! Modelgate HTTP server
//!
//! Starts an Axum web server that classifies chat messages, routes them to
//! the matching LLM provider, and persists conversation history.

use clap::Parser;
use modelgate::cli::{Cli, Command, generate_config_template};
use modelgate::config::{Config, Secrets};
use modelgate::handlers::{self, AppState};
use modelgate::telemetry;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Template generation runs without config or secrets
    if let Some(Command::Config { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_config_template())?;
                println!("Wrote configuration template to {path}");
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    // Load configuration
    let config = Config::from_file(&cli.config)?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    // Missing credentials or database URL are fatal; never serve without them
    let secrets = Secrets::from_env()?;

    tracing::info!(
        "Starting Modelgate server on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(database_url = %secrets.database_url, "Opening conversation store");

    // Build application state and router
    let config = Arc::new(config);
    let state = AppState::new(config.clone(), &secrets).await?;
    let app = handlers::router(state);

    // Create socket address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check available at http://{}/api/health", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
