//! Knots and crosses game engine.
//!
//! Pure game logic with no I/O and no shared state. A server hosts many
//! [`Game`]s and drives them through [`play_turn`].
//!
//! # Architecture
//!
//! - **Board**: 3x3 grid, Cartesian coordinate translation, placement log
//! - **Game**: identity, open/closed lifecycle, winner, timestamps
//! - **Turn**: human move, outcome check, automated reply, outcome check
//! - **Replay**: board snapshots rebuilt from the move log
//!
//! # Example
//!
//! ```
//! use knots_core::{Coordinate, Mark, MoveResult, create_game, play_turn};
//!
//! let mut game = create_game();
//! let result = play_turn(&mut game, 2, 2);
//! assert!(matches!(result, MoveResult::Continued { .. }));
//! assert_eq!(
//!     game.board().get(Coordinate::new(2, 2).unwrap()),
//!     knots_core::Square::Occupied(Mark::X)
//! );
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod game;
mod replay;
pub mod rules;
mod turn;

pub use board::{Board, Coordinate, Grid, Mark, Move, RenderedBoard, Square, SIZE};
pub use error::GameError;
pub use game::{Game, GameId, Outcome, Status, create_game};
pub use replay::{HistoryReplay, Snapshot, history_replay};
pub use turn::{MoveResult, play_turn, play_turn_with};
