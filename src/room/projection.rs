//! Per-client read model over received room snapshots.
//!
//! Nothing here mutates anything: the projection only derives view flags
//! from the latest authoritative record, and guards ingestion against the
//! feed's duplicate and out-of-order deliveries.

use crate::games::connect_four::{LastMove, Player};
use crate::room::record::{RoomRecord, RoomStatus};
use std::sync::Arc;
use tracing::{debug, instrument};

/// UI-facing booleans derived from one record for one viewer.
#[derive(Debug, Clone, Copy)]
pub struct RoomView<'a> {
    record: &'a RoomRecord,
    seat: Option<Player>,
}

impl<'a> RoomView<'a> {
    /// Builds the view of `record` as seen by `viewer`.
    pub fn new(record: &'a RoomRecord, viewer: &str) -> Self {
        Self {
            record,
            seat: record.seat_of(viewer),
        }
    }

    /// The seat the viewer holds, if any.
    pub fn my_seat(&self) -> Option<Player> {
        self.seat
    }

    /// Whether the viewer may move right now: their seat matches the turn
    /// marker and the room is in progress.
    pub fn is_my_turn(&self) -> bool {
        self.seat == Some(*self.record.current_player())
            && *self.record.status() == RoomStatus::InProgress
    }

    /// Whether the column can accept no further disc.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.record.grid().is_column_full(col)
    }

    /// Whether `(row, col)` belongs to the winning line.
    pub fn is_winning_cell(&self, row: usize, col: usize) -> bool {
        self.record
            .winning_line()
            .as_ref()
            .is_some_and(|line| line.contains(row, col))
    }

    /// Whether `(row, col)` holds the most recently placed disc.
    pub fn is_last_move(&self, row: usize, col: usize) -> bool {
        *self.record.last_move() == Some(LastMove { row, col })
    }
}

/// Ingestion guard for one client's subscription.
///
/// The feed is at-least-once and may reorder under adversarial conditions,
/// so every received record is treated as a full replacement and anything
/// not newer than the last applied version is discarded.
#[derive(Debug, Clone, Default)]
pub struct RoomFollower {
    latest: Option<Arc<RoomRecord>>,
}

impl RoomFollower {
    /// Creates a follower that has seen nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a received snapshot; returns `true` when it was applied.
    ///
    /// Duplicates and stale versions are dropped without touching the view
    /// state.
    #[instrument(skip(self, record), fields(version = *record.version()))]
    pub fn observe(&mut self, record: Arc<RoomRecord>) -> bool {
        if let Some(latest) = &self.latest
            && record.version() <= latest.version()
        {
            debug!(
                applied = *latest.version(),
                "Discarding stale or duplicate snapshot"
            );
            return false;
        }
        self.latest = Some(record);
        true
    }

    /// The last applied snapshot, if any.
    pub fn latest(&self) -> Option<&RoomRecord> {
        self.latest.as_deref()
    }

    /// The view of the last applied snapshot for the given viewer.
    pub fn view(&self, viewer: &str) -> Option<RoomView<'_>> {
        self.latest().map(|record| RoomView::new(record, viewer))
    }
}
