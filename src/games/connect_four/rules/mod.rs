//! Pure rules engine: disc drops, win detection, draw detection.
//!
//! Everything here is stateless -- identical inputs produce identical
//! outputs, so the functions are safe to call concurrently without
//! synchronization. The local controller and the room service both drive
//! their transitions through [`resolve_drop`] so the two modes share one
//! rules path.

mod draw;
mod drop;
mod win;

pub use draw::is_full;
pub use drop::{ColumnFull, apply_drop};
pub use win::detect_win;

use super::types::{Grid, LastMove, MatchResult, Player, WinningLine};
use tracing::instrument;

/// The full effect of one resolved drop.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Grid after the disc settled.
    pub grid: Grid,
    /// Where the disc landed.
    pub landed: LastMove,
    /// Outcome after this drop: still in progress, won, or drawn.
    pub result: MatchResult,
    /// The four winning cells when `result` is a win.
    pub winning_line: Option<WinningLine>,
}

/// Drops a disc and classifies the resulting position.
///
/// Win detection runs before draw detection, so a disc that completes four
/// in a row while filling the last empty cell still counts as a win.
///
/// # Errors
///
/// Returns [`ColumnFull`] if the column cannot accept a disc; the input grid
/// is unchanged.
#[instrument(skip(grid))]
pub fn resolve_drop(grid: &Grid, column: usize, player: Player) -> Result<MoveOutcome, ColumnFull> {
    let (grid, row) = apply_drop(grid, column, player)?;
    let landed = LastMove { row, col: column };

    if let Some(line) = detect_win(&grid, player) {
        return Ok(MoveOutcome {
            grid,
            landed,
            result: MatchResult::WonBy(player),
            winning_line: Some(line),
        });
    }

    let result = if is_full(&grid) {
        MatchResult::Draw
    } else {
        MatchResult::InProgress
    };

    Ok(MoveOutcome {
        grid,
        landed,
        result,
        winning_line: None,
    })
}
