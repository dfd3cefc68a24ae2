//! Scripted games for smoke-testing a running server.

use crate::api::{AppState, MoveParams, StateResponse, describe_game, new_game, submit_move};
use crate::error::ApiError;
use crate::registry::OwnerKey;
use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use knots_core::{Coordinate, Game, Mark, Outcome};
use std::net::SocketAddr;
use tracing::{info, instrument, warn};

/// Human moves played by [`scripted_game`].
const SCRIPT: [(i64, i64); 4] = [(1, 3), (2, 3), (2, 2), (3, 3)];

/// `GET /game/test`
///
/// Starts a game and plays a fixed human script against the random
/// opponent. Moves the opponent already took are reported invalid and
/// skipped, as they would be for a real caller.
#[instrument(skip(state))]
pub async fn scripted_game(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<StateResponse>, ApiError> {
    let owner = OwnerKey::from(addr.ip());
    let game_id = new_game(&state.registry, &owner).game_id;

    for (x, y) in SCRIPT {
        let response = submit_move(&state.registry, &owner, &game_id, MoveParams { x, y })?;
        info!(x, y, result = ?response.result, "Scripted move");
    }

    describe_game(&state.registry, &owner, &game_id).map(Json)
}

/// `GET /game/test/computer_win`
///
/// Builds a game the automated player wins on the anti-diagonal, bypassing
/// the random opponent.
#[instrument(skip(state))]
pub async fn computer_win(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<StateResponse>, ApiError> {
    let owner = OwnerKey::from(addr.ip());
    let game = scripted_computer_win()?;
    if *game.winner() != Outcome::Won(Mark::O) {
        warn!(winner = %game.winner(), "Scripted game ended unexpectedly");
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Scripted game ended with winner {}", game.winner()),
        ));
    }

    let game_id = game.id().clone();
    state.registry.insert(&owner, game);
    describe_game(&state.registry, &owner, &game_id).map(Json)
}

fn scripted_computer_win() -> Result<Game, ApiError> {
    let mut game = Game::new();
    let script = [
        (Mark::X, 1, 3),
        (Mark::O, 2, 2),
        (Mark::X, 1, 2),
        (Mark::O, 1, 1),
        (Mark::X, 3, 1),
        (Mark::O, 3, 3),
    ];
    for (mark, x, y) in script {
        let at = Coordinate::new(x, y)?;
        match mark {
            Mark::X => game.apply_human_move(at),
            Mark::O => game.apply_computer_move_at(at),
        }
    }
    game.evaluate_outcome();
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knots_core::Status;

    #[test]
    fn test_scripted_computer_win() {
        let game = scripted_computer_win().unwrap();
        assert_eq!(*game.winner(), Outcome::Won(Mark::O));
        assert_eq!(*game.status(), Status::Closed);
        assert_eq!(game.board().history().len(), 6);
    }
}
