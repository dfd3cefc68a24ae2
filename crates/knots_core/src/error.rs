//! Error taxonomy for game operations.

use derive_more::{Display, Error};

/// Reasons a game operation can be refused.
///
/// None of these are faults: callers turn each one into a descriptive
/// response for the player.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A coordinate fell outside `1..=3`.
    #[display("Coordinate ({x}, {y}) is off the board; x and y must be between 1 and 3")]
    InvalidCoordinate {
        /// Requested x.
        x: i64,
        /// Requested y.
        y: i64,
    },

    /// The target square already holds a mark.
    #[display("Square ({x}, {y}) is already taken")]
    OccupiedCell {
        /// Column, counted from the left.
        x: u8,
        /// Row, counted from the bottom.
        y: u8,
    },

    /// The game has already reached an outcome.
    #[display("Game is already over")]
    GameClosed,

    /// No game with this id belongs to the caller.
    #[display("Can't find a game with id {id}")]
    UnknownGame {
        /// The id that was looked up.
        id: String,
    },

    /// The automated player had no empty square to take.
    #[display("Board is full, no move possible")]
    BoardFull,
}
