//! Outcome rules.
//!
//! Pure functions over a [`Grid`], kept apart from board storage so the
//! game and the tests can evaluate any snapshot.

use crate::board::{Grid, Mark, SIZE, Square};
use crate::game::Outcome;
use tracing::{debug, instrument};

/// Checks lines for three matching marks.
///
/// Order is fixed and the first match wins: rows top to bottom, columns left
/// to right, the main diagonal (top-left to bottom-right), then the
/// anti-diagonal (top-right to bottom-left).
#[instrument(skip(grid))]
pub fn check_winner(grid: &Grid) -> Option<Mark> {
    let rows = (0..SIZE).map(|r| [(r, 0), (r, 1), (r, 2)]);
    let cols = (0..SIZE).map(|c| [(0, c), (1, c), (2, c)]);
    let diagonals = [[(0, 0), (1, 1), (2, 2)], [(0, 2), (1, 1), (2, 0)]];

    for line in rows.chain(cols).chain(diagonals) {
        let [a, b, c] = line.map(|(r, c)| grid[r][c]);
        if let Square::Occupied(mark) = a
            && a == b
            && b == c
        {
            debug!(?line, %mark, "Found winning line");
            return Some(mark);
        }
    }

    None
}

/// Checks if every square holds a mark.
pub fn is_full(grid: &Grid) -> bool {
    grid.iter().flatten().all(|s| *s != Square::Empty)
}

/// Derives the outcome of a grid from scratch.
///
/// A win takes precedence over a full board.
pub fn evaluate(grid: &Grid) -> Outcome {
    match check_winner(grid) {
        Some(mark) => Outcome::Won(mark),
        None if is_full(grid) => Outcome::Tie,
        None => Outcome::Pending,
    }
}
