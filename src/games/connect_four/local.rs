//! Same-device match controller.
//!
//! One authoritative in-memory copy of the match, a single sequential
//! writer, no concurrency concerns. The remote counterpart of this state
//! machine lives in the room service, which drives the same rules engine
//! through the atomic store.

use super::rules::{ColumnFull, resolve_drop};
use super::types::{COLS, Grid, LastMove, MatchResult, Player, ScoreTally, WinningLine};
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument};

/// Rejection raised by [`LocalMatch::drop_disc`]. The match state is
/// unchanged in every case; callers rendering a board may simply ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum LocalMoveError {
    /// The match already has a terminal result.
    #[display("match already over")]
    MatchOver,
    /// The target column is full.
    ColumnFull(ColumnFull),
}

/// State machine for a two-players-one-device match.
#[derive(Debug, Clone, Default)]
pub struct LocalMatch {
    grid: Grid,
    current_player: Player,
    result: MatchResult,
    winning_line: Option<WinningLine>,
    last_move: Option<LastMove>,
    scores: ScoreTally,
}

impl LocalMatch {
    /// Creates a fresh match with player one to move.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a disc for the player whose turn it is.
    ///
    /// On a winning drop the mover's tally is incremented and the turn
    /// marker freezes; on a draw the marker freezes; otherwise the turn
    /// passes to the opponent.
    ///
    /// # Errors
    ///
    /// Returns [`LocalMoveError`] when the match is already over or the
    /// column is full; the match state does not change.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn drop_disc(&mut self, column: usize) -> Result<(), LocalMoveError> {
        if self.result.is_terminal() {
            debug!("Drop ignored, match already over");
            return Err(LocalMoveError::MatchOver);
        }

        let mover = self.current_player;
        let outcome = resolve_drop(&self.grid, column, mover)?;

        self.grid = outcome.grid;
        self.last_move = Some(outcome.landed);
        self.winning_line = outcome.winning_line;
        self.result = outcome.result;

        match outcome.result {
            MatchResult::WonBy(winner) => {
                self.scores.record_win(winner);
                info!(winner = %winner, "Match won");
            }
            MatchResult::Draw => {
                info!("Match drawn");
            }
            MatchResult::InProgress => {
                self.current_player = mover.opponent();
            }
        }

        Ok(())
    }

    /// Starts a new match: fresh grid, player one to move, tally preserved.
    #[instrument(skip(self))]
    pub fn reset_match(&mut self) {
        info!("Resetting match");
        self.grid = Grid::new();
        self.current_player = Player::One;
        self.result = MatchResult::InProgress;
        self.winning_line = None;
        self.last_move = None;
    }

    /// Zeroes the win counters; the match in progress is untouched.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        info!("Resetting scores");
        self.scores.reset();
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the player whose turn it is. Frozen once the match ends.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the match result.
    pub fn result(&self) -> MatchResult {
        self.result
    }

    /// Returns the winning line, if the match has been won.
    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    /// Returns the most recent move, if any.
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// Returns the win counters.
    pub fn scores(&self) -> ScoreTally {
        self.scores
    }

    /// Whether the column can accept no further disc.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.grid.is_column_full(col)
    }

    /// Whether `(row, col)` belongs to the winning line.
    pub fn is_winning_cell(&self, row: usize, col: usize) -> bool {
        self.winning_line
            .as_ref()
            .is_some_and(|line| line.contains(row, col))
    }

    /// Whether `(row, col)` holds the most recently placed disc.
    pub fn is_last_move(&self, row: usize, col: usize) -> bool {
        self.last_move == Some(LastMove { row, col })
    }

    /// Columns that can still accept a disc.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|col| !self.is_column_full(*col)).collect()
    }
}
