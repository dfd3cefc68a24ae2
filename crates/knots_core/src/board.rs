//! Board storage, coordinates and the placement log.

use crate::error::GameError;
use derive_new::new;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Side length of the board.
pub const SIZE: usize = 3;

/// A player's mark.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Mark {
    /// The human player (moves first).
    X,
    /// The automated player.
    O,
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark on this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Square::Empty => write!(f, "."),
            Square::Occupied(mark) => write!(f, "{mark}"),
        }
    }
}

/// Cartesian position on the board, 1-indexed.
///
/// `x` counts columns from the left and `y` counts rows from the bottom, so
/// `(1, 1)` is the bottom-left square and `(3, 3)` the top-right. Values are
/// range-checked on construction; a `Coordinate` always maps to a real square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
    x: u8,
    y: u8,
}

impl Coordinate {
    /// Creates a coordinate, rejecting anything outside `1..=3`.
    pub fn new(x: i64, y: i64) -> Result<Self, GameError> {
        let range = 1..=SIZE as i64;
        if !range.contains(&x) || !range.contains(&y) {
            return Err(GameError::InvalidCoordinate { x, y });
        }
        Ok(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Column counted from the left (1-3).
    pub fn x(self) -> u8 {
        self.x
    }

    /// Row counted from the bottom (1-3).
    pub fn y(self) -> u8 {
        self.y
    }

    /// Storage row; row 0 is the top of the board.
    pub fn row(self) -> usize {
        SIZE - self.y as usize
    }

    /// Storage column; column 0 is the left edge.
    pub fn col(self) -> usize {
        self.x as usize - 1
    }

    fn from_storage(row: usize, col: usize) -> Self {
        Self {
            x: (col + 1) as u8,
            y: (SIZE - row) as u8,
        }
    }

    /// Every square, top row first, left to right.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Self::from_storage(row, col)))
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One recorded placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, new)]
pub struct Move {
    /// Mark that was placed.
    pub mark: Mark,
    /// Where it was placed.
    pub at: Coordinate,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.at)
    }
}

/// Raw board storage, top row first.
pub type Grid = [[Square; SIZE]; SIZE];

/// 3x3 board plus the ordered log of every placement made on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Board {
    grid: Grid,
    history: Vec<Move>,
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at the given coordinate.
    pub fn get(&self, at: Coordinate) -> Square {
        self.grid[at.row()][at.col()]
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, at: Coordinate) -> bool {
        self.get(at) == Square::Empty
    }

    /// Checks if every square holds a mark.
    pub fn is_full(&self) -> bool {
        crate::rules::is_full(&self.grid)
    }

    /// Returns the raw grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns every placement in the order it was made.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns placements paired with their 1-based turn number.
    pub fn turns(&self) -> impl Iterator<Item = (usize, Move)> + '_ {
        self.history.iter().copied().enumerate().map(|(i, mv)| (i + 1, mv))
    }

    /// Lists the empty squares, top row first.
    pub fn empty_cells(&self) -> Vec<Coordinate> {
        Coordinate::all().filter(|at| self.is_empty(*at)).collect()
    }

    /// Writes `mark` at `at` and logs it as the next turn.
    ///
    /// Occupancy is not checked here; callers validate first. Returns the
    /// turn number assigned to this placement.
    #[instrument(skip(self), fields(turn = self.history.len() + 1))]
    pub fn place(&mut self, at: Coordinate, mark: Mark) -> usize {
        self.grid[at.row()][at.col()] = Square::Occupied(mark);
        self.history.push(Move::new(mark, at));
        trace!(%at, %mark, "Placed mark");
        self.history.len()
    }

    /// Places `mark` on a uniformly chosen empty square.
    ///
    /// Returns `None` when the board is full.
    pub fn place_random(&mut self, mark: Mark) -> Option<Coordinate> {
        self.place_random_with(mark, &mut rand::rng())
    }

    /// Like [`Board::place_random`], drawing from the given generator.
    #[instrument(skip(self, rng))]
    pub fn place_random_with<R: Rng + ?Sized>(
        &mut self,
        mark: Mark,
        rng: &mut R,
    ) -> Option<Coordinate> {
        let open = self.empty_cells();
        let at = *open.choose(rng)?;
        self.place(at, mark);
        Some(at)
    }

    /// Renders the live grid.
    pub fn render(&self) -> RenderedBoard {
        RenderedBoard::from_grid(&self.grid)
    }
}

/// Display form of a grid: three rows, top first, cells joined by `" | "`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderedBoard {
    /// Top row.
    pub row1: String,
    /// Middle row.
    pub row2: String,
    /// Bottom row.
    pub row3: String,
}

impl RenderedBoard {
    /// Renders any grid snapshot.
    pub fn from_grid(grid: &Grid) -> Self {
        let row = |cells: &[Square; SIZE]| {
            cells
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ")
        };
        Self {
            row1: row(&grid[0]),
            row2: row(&grid[1]),
            row3: row(&grid[2]),
        }
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> [&str; SIZE] {
        [&self.row1, &self.row2, &self.row3]
    }
}

impl std::fmt::Display for RenderedBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}\n{}", self.row1, self.row2, self.row3)
    }
}
