//! Win detection logic for connect-four.

use super::super::types::{COLS, Cell, Grid, Player, ROWS, WIN_LENGTH, WinningLine};
use tracing::instrument;

/// Scan directions as `(row delta, col delta)`, in tie-break order:
/// horizontal, vertical, diagonal-down-right, diagonal-down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether the player has four aligned discs on the grid.
///
/// Every cell is scanned in row-major order, each of the four directions in
/// turn, so the returned line is deterministic when several exist at once.
/// Returns `None` if no four-in-a-row is present for the player.
#[instrument(skip(grid))]
pub fn detect_win(grid: &Grid, player: Player) -> Option<WinningLine> {
    for row in 0..ROWS {
        for col in 0..COLS {
            for (d_row, d_col) in DIRECTIONS {
                if let Some(line) = line_from(grid, row, col, d_row, d_col, player) {
                    return Some(line);
                }
            }
        }
    }

    None
}

/// Collects four consecutive same-player cells starting at `(row, col)` and
/// stepping by `(d_row, d_col)`, or `None` if the run leaves the grid or
/// meets a cell the player does not hold.
fn line_from(
    grid: &Grid,
    row: usize,
    col: usize,
    d_row: isize,
    d_col: isize,
    player: Player,
) -> Option<WinningLine> {
    let mut cells = [(0usize, 0usize); WIN_LENGTH];

    for (step, slot) in cells.iter_mut().enumerate() {
        let r = row as isize + step as isize * d_row;
        let c = col as isize + step as isize * d_col;
        if r < 0 || r >= ROWS as isize || c < 0 || c >= COLS as isize {
            return None;
        }
        let (r, c) = (r as usize, c as usize);
        if grid.get(r, c) != Cell::Occupied(player) {
            return None;
        }
        *slot = (r, c);
    }

    Some(WinningLine::new(cells))
}
