//! Game lifecycle: identity, open/closed status, winner and timestamps.

use crate::board::{Board, Coordinate, Mark};
use crate::error::GameError;
use crate::rules;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Opaque game identifier.
pub type GameId = String;

/// Whether a game still accepts moves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Status {
    /// Moves are accepted.
    Open,
    /// An outcome was reached. Never reopens.
    Closed,
}

/// Result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No result yet.
    Pending,
    /// A player completed a line.
    Won(Mark),
    /// Board filled with no line.
    Tie,
}

impl Outcome {
    /// True for a win or a tie.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    /// Returns the winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Won(mark) => Some(mark),
            Outcome::Pending | Outcome::Tie => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pending => write!(f, "None yet"),
            Outcome::Won(mark) => write!(f, "{mark}"),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One game of knots and crosses.
///
/// The human always plays [`Mark::X`] and moves first; the automated
/// player answers with [`Mark::O`]. `updated_at` tracks human activity only.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct Game {
    /// Immutable identifier.
    id: GameId,
    /// Open until an outcome is reached.
    status: Status,
    /// Stored outcome; [`Outcome::Pending`] while open.
    winner: Outcome,
    /// The board, owned by this game alone.
    board: Board,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Time of the last human move.
    updated_at: DateTime<Utc>,
}

/// Creates a fresh open game with a random id.
pub fn create_game() -> Game {
    Game::new()
}

impl Game {
    /// Creates a fresh open game with a random id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string())
    }

    /// Creates a fresh open game with the given id.
    #[instrument(skip(id), fields(game_id))]
    pub fn with_id(id: impl Into<GameId>) -> Self {
        let id = id.into();
        tracing::Span::current().record("game_id", id.as_str());
        let now = Utc::now();
        debug!("Creating game");
        Self {
            id,
            status: Status::Open,
            winner: Outcome::Pending,
            board: Board::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True while the game accepts moves.
    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }

    /// Explains why a move at `at` would be refused, if it would be.
    pub fn check_move(&self, at: Coordinate) -> Result<(), GameError> {
        if !self.is_open() {
            return Err(GameError::GameClosed);
        }
        if !self.board.is_empty(at) {
            return Err(GameError::OccupiedCell {
                x: at.x(),
                y: at.y(),
            });
        }
        Ok(())
    }

    /// True iff the game is open and the square is empty.
    pub fn is_valid_move(&self, at: Coordinate) -> bool {
        self.check_move(at).is_ok()
    }

    /// Places the human's mark and refreshes `updated_at`.
    ///
    /// Does not validate; call [`Game::check_move`] first.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn apply_human_move(&mut self, at: Coordinate) {
        let turn = self.board.place(at, Mark::X);
        self.updated_at = Utc::now().max(self.created_at);
        info!(turn, %at, "Human move applied");
    }

    /// Places the automated player's mark on a random empty square.
    ///
    /// Leaves `updated_at` alone. Returns `None` when the board is full.
    pub fn apply_computer_move(&mut self) -> Option<Coordinate> {
        self.apply_computer_move_with(&mut rand::rng())
    }

    /// Like [`Game::apply_computer_move`], drawing from the given generator.
    #[instrument(skip(self, rng), fields(game_id = %self.id))]
    pub fn apply_computer_move_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coordinate> {
        let chosen = self.board.place_random_with(Mark::O, rng);
        match chosen {
            Some(at) => info!(%at, "Computer move applied"),
            None => warn!("No empty square for computer move"),
        }
        chosen
    }

    /// Places the automated player's mark on a chosen square.
    ///
    /// Used by scripted games. Leaves `updated_at` alone and does not
    /// validate.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn apply_computer_move_at(&mut self, at: Coordinate) {
        let turn = self.board.place(at, Mark::O);
        debug!(turn, %at, "Scripted computer move applied");
    }

    /// Evaluates the board and closes the game on a win or tie.
    ///
    /// Once closed the stored winner is returned as is; the board is not
    /// looked at again.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn evaluate_outcome(&mut self) -> Outcome {
        if !self.is_open() {
            debug!(winner = %self.winner, "Game already closed");
            return self.winner;
        }

        let outcome = rules::evaluate(self.board.grid());
        if outcome.is_terminal() {
            self.status = Status::Closed;
            self.winner = outcome;
            info!(winner = %outcome, turns = self.board.history().len(), "Game closed");
        }
        outcome
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
