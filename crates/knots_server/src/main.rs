//! Knots and crosses server binary.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use knots_server::{AppState, GameRegistry, ServerConfig, serve};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Http { port, host } => {
            let port = port.or_else(env_port);
            run_http_server(config.with_overrides(host, port)).await
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Reads `$PORT` when set to a valid port number.
fn env_port() -> Option<u16> {
    std::env::var("PORT").ok().and_then(|p| p.parse().ok())
}

/// Run the HTTP game server
async fn run_http_server(config: ServerConfig) -> Result<()> {
    init_tracing(config.log_filter());

    info!(
        host = %config.host(),
        port = config.port(),
        "Starting knots and crosses server"
    );
    debug!(?config, "Effective configuration");

    let state = AppState::new(GameRegistry::new());
    serve(&config, state).await
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
