//! Request handlers and response bodies.

use crate::error::ApiError;
use crate::registry::{GameRegistry, OwnerKey};
use axum::Json;
use axum::extract::{ConnectInfo, Path, Query, State};
use chrono::{DateTime, Utc};
use knots_core::{Game, GameId, MoveResult, RenderedBoard, Snapshot, history_replay, play_turn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{debug, info, instrument};

/// Shared handler state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Games by owner.
    pub registry: GameRegistry,
}

impl AppState {
    /// Wraps an existing registry.
    pub fn new(registry: GameRegistry) -> Self {
        Self { registry }
    }
}

/// Plain message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Text for the player.
    pub message: String,
}

/// Body returned when a game is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGameResponse {
    /// Id to use in later requests.
    pub game_id: GameId,
    /// Instructions.
    pub message: String,
    /// The empty board.
    pub board: RenderedBoard,
}

/// Coordinates of a submitted move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveParams {
    /// Column counted from the left (1-3).
    pub x: i64,
    /// Row counted from the bottom (1-3).
    pub y: i64,
}

/// How a submitted move turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnResult {
    /// Game continues.
    Continued,
    /// Human completed a line.
    HumanWon,
    /// Automated player completed a line.
    ComputerWon,
    /// Board filled with no line.
    Tied,
    /// Move refused.
    Invalid,
}

/// Body returned for a submitted move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    /// How the move turned out.
    pub result: TurnResult,
    /// Text for the player.
    pub message: String,
    /// Board after the turn.
    pub board: RenderedBoard,
    /// Turn-by-turn replay, present once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Snapshot>>,
}

impl From<MoveResult> for MoveResponse {
    fn from(result: MoveResult) -> Self {
        let (result, message, board, history) = match result {
            MoveResult::Continued { board } => {
                (TurnResult::Continued, "Move successful".to_string(), board, None)
            }
            MoveResult::HumanWon { board, history } => (
                TurnResult::HumanWon,
                "X has won the game! Congratulations!".to_string(),
                board,
                Some(history),
            ),
            MoveResult::ComputerWon { board, history } => (
                TurnResult::ComputerWon,
                "O has won the game! Try again next time!".to_string(),
                board,
                Some(history),
            ),
            MoveResult::Tied { board, history } => (
                TurnResult::Tied,
                "The game is a tie!".to_string(),
                board,
                Some(history),
            ),
            MoveResult::Invalid { reason, board } => (
                TurnResult::Invalid,
                format!("Invalid move: {reason}"),
                board,
                None,
            ),
        };
        Self {
            result,
            message,
            board,
            history,
        }
    }
}

/// Body returned for a state query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    /// Text for the player.
    pub message: String,
    /// Current board.
    pub board: RenderedBoard,
    /// Winner so far ("None yet" while open).
    pub winner: String,
    /// True while moves are accepted.
    pub open: bool,
    /// Turn-by-turn replay from the empty board.
    pub history: Vec<Snapshot>,
}

impl From<&Game> for StateResponse {
    fn from(game: &Game) -> Self {
        Self {
            message: "Here's the current state and history of the board".to_string(),
            board: game.board().render(),
            winner: game.winner().to_string(),
            open: game.is_open(),
            history: history_replay(game).collect(),
        }
    }
}

/// One entry in a game listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    /// Game id.
    pub game_id: GameId,
    /// True while moves are accepted.
    pub open: bool,
    /// Winner so far ("None yet" while open).
    pub winner: String,
    /// Current board.
    pub board: RenderedBoard,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last human move.
    pub updated_at: DateTime<Utc>,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id().clone(),
            open: game.is_open(),
            winner: game.winner().to_string(),
            board: game.board().render(),
            created_at: *game.created_at(),
            updated_at: *game.updated_at(),
        }
    }
}

fn owner_of(addr: SocketAddr) -> OwnerKey {
    OwnerKey::from(addr.ip())
}

/// Creates a game and describes how to play it.
pub(crate) fn new_game(registry: &GameRegistry, owner: &OwnerKey) -> NewGameResponse {
    let game = registry.create_game(owner);
    NewGameResponse {
        game_id: game.id().clone(),
        message: concat!(
            "Welcome to knots and crosses! Here's your empty game board, ",
            "feel free to go first! Keep your unique `game_id` safe ",
            "so that no one else can make unauthorized moves in your game. ",
            "Make a move by sending `x` and `y` query parameters to ",
            "`/game/{game_id}/move`; x counts from the left and y from the bottom, both 1 to 3."
        )
        .to_string(),
        board: game.board().render(),
    }
}

/// Plays one round in a stored game.
pub(crate) fn submit_move(
    registry: &GameRegistry,
    owner: &OwnerKey,
    game_id: &str,
    params: MoveParams,
) -> Result<MoveResponse, ApiError> {
    let result = registry.with_game(owner, game_id, |game| {
        play_turn(game, params.x, params.y)
    })?;
    Ok(MoveResponse::from(result))
}

/// Describes a stored game.
pub(crate) fn describe_game(
    registry: &GameRegistry,
    owner: &OwnerKey,
    game_id: &str,
) -> Result<StateResponse, ApiError> {
    let game = registry.get_game(owner, game_id)?;
    Ok(StateResponse::from(&game))
}

/// `GET /`
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to knots and crosses! Visit the /game/init endpoint to start a new game"
            .to_string(),
    })
}

/// `GET /game/init`
#[instrument(skip(state))]
pub async fn init_game(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Json<NewGameResponse> {
    let owner = owner_of(addr);
    let response = new_game(&state.registry, &owner);
    info!(%owner, game_id = %response.game_id, "New game started");
    Json(response)
}

/// `GET|POST /game/{game_id}/move?x=&y=`
#[instrument(skip(state))]
pub async fn make_move(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(game_id): Path<String>,
    Query(params): Query<MoveParams>,
) -> Result<Json<MoveResponse>, ApiError> {
    let response = submit_move(&state.registry, &owner_of(addr), &game_id, params)?;
    info!(result = ?response.result, "Move processed");
    Ok(Json(response))
}

/// `GET /game/{game_id}/state`
#[instrument(skip(state))]
pub async fn game_state(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(game_id): Path<String>,
) -> Result<Json<StateResponse>, ApiError> {
    describe_game(&state.registry, &owner_of(addr), &game_id).map(Json)
}

/// `GET /game/list`
#[instrument(skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Json<Vec<GameSummary>> {
    let games = state.registry.list_games(&owner_of(addr));
    debug!(count = games.len(), "Listing games");
    Json(games.iter().map(GameSummary::from).collect())
}
