//! One round of play: the human's move, then the automated reply.

use crate::board::{Coordinate, Mark, RenderedBoard};
use crate::error::GameError;
use crate::game::{Game, Outcome};
use crate::replay::{Snapshot, history_replay};
use rand::Rng;
use tracing::{info, instrument, warn};

/// What happened when a human submitted a move.
///
/// Every variant carries the board as it stands afterwards. Terminal
/// variants also carry the full turn-by-turn replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Both moves were made and the game goes on.
    Continued {
        /// Board after the automated reply.
        board: RenderedBoard,
    },
    /// The human's move completed a line. No reply was made.
    HumanWon {
        /// Final board.
        board: RenderedBoard,
        /// Snapshots from turn 0.
        history: Vec<Snapshot>,
    },
    /// The automated reply completed a line.
    ComputerWon {
        /// Final board.
        board: RenderedBoard,
        /// Snapshots from turn 0.
        history: Vec<Snapshot>,
    },
    /// The board filled up with no line.
    Tied {
        /// Final board.
        board: RenderedBoard,
        /// Snapshots from turn 0.
        history: Vec<Snapshot>,
    },
    /// The move was refused; nothing changed.
    Invalid {
        /// Why the move was refused.
        reason: GameError,
        /// Unchanged board.
        board: RenderedBoard,
    },
}

impl MoveResult {
    /// Board after the turn.
    pub fn board(&self) -> &RenderedBoard {
        match self {
            MoveResult::Continued { board }
            | MoveResult::HumanWon { board, .. }
            | MoveResult::ComputerWon { board, .. }
            | MoveResult::Tied { board, .. }
            | MoveResult::Invalid { board, .. } => board,
        }
    }

    /// Replay for terminal results.
    pub fn history(&self) -> Option<&[Snapshot]> {
        match self {
            MoveResult::HumanWon { history, .. }
            | MoveResult::ComputerWon { history, .. }
            | MoveResult::Tied { history, .. } => Some(history),
            MoveResult::Continued { .. } | MoveResult::Invalid { .. } => None,
        }
    }

    /// True when the turn ended the game.
    pub fn is_terminal(&self) -> bool {
        self.history().is_some()
    }
}

/// Plays one round: the human's `X` at `(x, y)`, then a random `O` reply.
pub fn play_turn(game: &mut Game, x: i64, y: i64) -> MoveResult {
    play_turn_with(game, x, y, &mut rand::rng())
}

/// Like [`play_turn`], drawing the automated reply from the given generator.
///
/// The reply is skipped when the human's move ends the game or when the move
/// is refused. Only the human's move refreshes `updated_at`.
#[instrument(skip(game, rng), fields(game_id = %game.id()))]
pub fn play_turn_with<R: Rng + ?Sized>(game: &mut Game, x: i64, y: i64, rng: &mut R) -> MoveResult {
    let at = match Coordinate::new(x, y).and_then(|at| game.check_move(at).map(|()| at)) {
        Ok(at) => at,
        Err(reason) => {
            warn!(%reason, "Move refused");
            return MoveResult::Invalid {
                reason,
                board: game.board().render(),
            };
        }
    };

    game.apply_human_move(at);
    let outcome = game.evaluate_outcome();
    if outcome.is_terminal() {
        return finished(game, outcome);
    }

    if game.apply_computer_move_with(rng).is_none() {
        warn!("Skipping computer move on a full board");
    }
    let outcome = game.evaluate_outcome();
    if outcome.is_terminal() {
        return finished(game, outcome);
    }

    MoveResult::Continued {
        board: game.board().render(),
    }
}

fn finished(game: &Game, outcome: Outcome) -> MoveResult {
    let board = game.board().render();
    let history = history_replay(game).collect();
    info!(winner = %outcome, "Turn ended the game");
    match outcome {
        Outcome::Won(Mark::X) => MoveResult::HumanWon { board, history },
        Outcome::Won(Mark::O) => MoveResult::ComputerWon { board, history },
        Outcome::Tie | Outcome::Pending => MoveResult::Tied { board, history },
    }
}
