//! Disc drop logic for connect-four.

use super::super::types::{COLS, Cell, Grid, Player, ROWS};
use derive_more::{Display, Error};
use tracing::instrument;

/// Error returned when a drop targets a column with no empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("column {column} is full")]
pub struct ColumnFull {
    /// The rejected column.
    pub column: usize,
}

/// Drops a disc into the given column and returns the new grid together with
/// the row the disc landed in.
///
/// Scans the column from the bottom row upward; the first empty cell receives
/// the disc. The input grid is never modified. `column` must be in range --
/// an out-of-range index is a caller contract violation, not a recoverable
/// error.
///
/// # Errors
///
/// Returns [`ColumnFull`] if every cell in the column is occupied.
#[instrument(skip(grid))]
pub fn apply_drop(grid: &Grid, column: usize, player: Player) -> Result<(Grid, usize), ColumnFull> {
    debug_assert!(column < COLS, "column out of range");

    for row in (0..ROWS).rev() {
        if grid.get(row, column) == Cell::Empty {
            let mut next = grid.clone();
            next.set(row, column, Cell::Occupied(player));
            return Ok((next, row));
        }
    }

    Err(ColumnFull { column })
}
