//! Error taxonomy for room operations.

use crate::games::connect_four::ColumnFull;
use derive_more::{Display, Error, From};

/// Rejection raised by a room operation.
///
/// Every variant is recoverable and leaves the stored record untouched; the
/// service never applies a partial mutation and never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum RoomError {
    /// No room matches the given code or id.
    #[display("room not found")]
    RoomNotFound,
    /// A different guest already holds the second seat.
    #[display("room is full")]
    RoomFull,
    /// The turn marker names the other seat, or the mover holds no seat.
    #[display("not your turn")]
    NotYourTurn,
    /// The current match already has a terminal result.
    #[display("match already over")]
    MatchAlreadyOver,
    /// The room lifecycle state does not allow the operation.
    #[display("room is not in progress")]
    RoomNotInProgress,
    /// The target column cannot accept a disc.
    ColumnFull(ColumnFull),
    /// The column index is outside the grid. Raised at the service boundary
    /// so untrusted input never reaches the engine's precondition.
    #[display("column {column} is out of range")]
    #[from(ignore)]
    InvalidColumn {
        /// The rejected column index.
        column: usize,
    },
    /// Code generation kept colliding with existing rooms.
    #[display("could not allocate an unused room code")]
    CodeAllocation,
}
