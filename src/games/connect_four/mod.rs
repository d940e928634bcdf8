mod local;
mod rules;
mod types;

pub use local::{LocalMatch, LocalMoveError};
pub use rules::{ColumnFull, MoveOutcome, apply_drop, detect_win, is_full, resolve_drop};
pub use types::{
    COLS, Cell, Grid, LastMove, MatchResult, Player, ROWS, ScoreTally, WIN_LENGTH, WinningLine,
};
