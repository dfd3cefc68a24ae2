//! Command-line interface for the knots server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Knots and crosses - play X against a random opponent over HTTP
#[derive(Parser, Debug)]
#[command(name = "knots")]
#[command(about = "Knots and crosses game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (optional)
    #[arg(short, long, global = true, default_value = "knots.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Port to bind to (falls back to $PORT, then the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}
