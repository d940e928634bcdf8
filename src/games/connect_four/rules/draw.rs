//! Draw detection logic for connect-four.

use super::super::types::{COLS, Cell, Grid};
use tracing::instrument;

/// Checks whether the grid can accept no further drop.
///
/// Discs settle bottom-up, so the top row fills last: a fully occupied top
/// row means every column is full. A full grid with no winner for the player
/// who just moved is a draw; callers check for a win first.
#[instrument(skip(grid))]
pub fn is_full(grid: &Grid) -> bool {
    (0..COLS).all(|col| grid.get(0, col) != Cell::Empty)
}
