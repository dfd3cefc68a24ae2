//! Turn-by-turn board snapshots rebuilt from a game's move log.

use crate::board::{Board, Move, RenderedBoard};
use crate::game::Game;
use serde::{Deserialize, Serialize};

/// The board as it stood after a given turn. Turn 0 is the empty board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of moves applied.
    pub turn: usize,
    /// Rendered board after those moves.
    pub board: RenderedBoard,
}

/// Lazy iterator over [`Snapshot`]s, one per turn plus the empty start.
///
/// Replays the move log onto a scratch [`Board`], so it depends on nothing
/// but the moves. Clone it to restart from the beginning.
#[derive(Debug, Clone)]
pub struct HistoryReplay<'a> {
    moves: &'a [Move],
    scratch: Board,
    next_turn: usize,
}

impl<'a> HistoryReplay<'a> {
    /// Replays the given moves in order.
    pub fn new(moves: &'a [Move]) -> Self {
        Self {
            moves,
            scratch: Board::new(),
            next_turn: 0,
        }
    }
}

impl Iterator for HistoryReplay<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.next_turn > self.moves.len() {
            return None;
        }
        if self.next_turn > 0 {
            let mv = self.moves[self.next_turn - 1];
            self.scratch.place(mv.at, mv.mark);
        }
        let snapshot = Snapshot {
            turn: self.next_turn,
            board: self.scratch.render(),
        };
        self.next_turn += 1;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.moves.len() + 1).saturating_sub(self.next_turn);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HistoryReplay<'_> {}

impl std::iter::FusedIterator for HistoryReplay<'_> {}

/// Replays a game's recorded moves from an empty board.
pub fn history_replay(game: &Game) -> HistoryReplay<'_> {
    HistoryReplay::new(game.board().history())
}
