//! Core domain types for connect-four.

use serde::{Deserialize, Serialize};

/// Number of rows in the grid. Row 0 is the visual top.
pub const ROWS: usize = 6;
/// Number of columns in the grid.
pub const COLS: usize = 7;
/// Number of aligned discs required to win.
pub const WIN_LENGTH: usize = 4;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    /// First player (hosts a room, always moves first).
    #[strum(serialize = "P1")]
    One,
    /// Second player (joins a room as guest).
    #[strum(serialize = "P2")]
    Two,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::One
    }
}

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// No disc has settled here.
    Empty,
    /// Cell holds the given player's disc.
    Occupied(Player),
}

/// 6x7 connect-four grid.
///
/// Row 0 is the visual top; discs settle bottom-up, so within any column the
/// occupied cells form a contiguous run starting at row 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Cells indexed `[row][column]`.
    cells: [[Cell; COLS]; ROWS],
}

impl Grid {
    /// Creates a new empty grid.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Gets the cell at the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `row >= ROWS` or `col >= COLS`.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Sets the cell at the given coordinates.
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Checks whether the column can accept no further disc.
    ///
    /// The top cell of a column fills last, so checking it alone suffices.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.cells[0][col] != Cell::Empty
    }

    /// Number of occupied cells across the whole grid.
    pub fn occupied_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }

    /// Number of occupied cells in one column.
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|row| self.cells[*row][col] != Cell::Empty)
            .count()
    }

    /// Formats the grid as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in &self.cells {
            for (col, cell) in row.iter().enumerate() {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::One) => 'X',
                    Cell::Occupied(Player::Two) => 'O',
                };
                result.push(symbol);
                if col < COLS - 1 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        for col in 0..COLS {
            result.push_str(&col.to_string());
            if col < COLS - 1 {
                result.push(' ');
            }
        }
        result
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered run of exactly four same-player cells.
///
/// Cells are listed from the scan origin outward along the winning direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    /// `(row, col)` coordinates of the four aligned discs.
    cells: [(usize, usize); WIN_LENGTH],
}

impl WinningLine {
    /// Creates a winning line from four coordinates.
    pub(crate) fn new(cells: [(usize, usize); WIN_LENGTH]) -> Self {
        Self { cells }
    }

    /// Returns the four coordinates of the line.
    pub fn cells(&self) -> &[(usize, usize); WIN_LENGTH] {
        &self.cells
    }

    /// Checks whether `(row, col)` belongs to the line.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.iter().any(|(r, c)| *r == row && *c == col)
    }
}

/// Coordinates of the most recently placed disc. Presentation only; carries
/// no rules semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    /// Row the disc landed in.
    pub row: usize,
    /// Column the disc was dropped into.
    pub col: usize,
}

/// Win counters for both players.
///
/// Counters only grow on wins; `reset` is the single way back to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    /// Matches won by player one.
    pub player_one_wins: u32,
    /// Matches won by player two.
    pub player_two_wins: u32,
}

impl ScoreTally {
    /// Increments the winner's counter.
    pub fn record_win(&mut self, winner: Player) {
        match winner {
            Player::One => self.player_one_wins += 1,
            Player::Two => self.player_two_wins += 1,
        }
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Outcome state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    /// Match is ongoing.
    InProgress,
    /// Match ended with a winner.
    WonBy(Player),
    /// Match ended with a full top row and no winner.
    Draw,
}

impl MatchResult {
    /// Whether the match has reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchResult::InProgress)
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        MatchResult::InProgress
    }
}
