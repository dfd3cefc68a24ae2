//! Router construction and the serving loop.

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::demo;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tracing::{info, instrument};

/// Builds the application router.
///
/// Handlers key games by the peer IP, so the router must be served with
/// connect info (see [`serve`]).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::welcome))
        .route("/game/init", get(api::init_game))
        .route("/game/list", get(api::list_games))
        .route("/game/test", get(demo::scripted_game))
        .route("/game/test/computer_win", get(demo::computer_win))
        .route(
            "/game/{game_id}/move",
            get(api::make_move).post(api::make_move),
        )
        .route("/game/{game_id}/state", get(api::game_state))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl+C.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(addr = %listener.local_addr()?, "Server ready");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
