//! Knots and crosses HTTP server.
//!
//! Hosts [`knots_core`] games for many callers at once. Each caller is keyed
//! by network address and plays `X` against a random automated `O`.
//!
//! # Architecture
//!
//! - **Registry**: owner key to game map, shared by all requests
//! - **Api**: axum handlers and JSON bodies
//! - **Demo**: scripted games for smoke tests
//! - **Config**: TOML file plus command-line overrides
//!
//! # Example
//!
//! ```no_run
//! use knots_server::{AppState, ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::load_or_default("knots.toml")?;
//! serve(&config, AppState::default()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod demo;
mod error;
mod registry;
mod server;

// Crate-level exports - Handlers and bodies
pub use api::{
    AppState, GameSummary, MessageResponse, MoveParams, MoveResponse, NewGameResponse,
    StateResponse, TurnResult,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Errors
pub use error::ApiError;

// Crate-level exports - Session registry
pub use registry::{GameRegistry, OwnerKey};

// Crate-level exports - Serving
pub use server::{router, serve};
