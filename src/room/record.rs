//! The canonical persisted description of one remote match.

use crate::games::connect_four::{
    Grid, LastMove, MatchResult, Player, ScoreTally, WinningLine,
};
use crate::room::code::RoomCode;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity token for a participant, supplied by the identity
/// provider collaborator. The core only ever compares it.
pub type ParticipantId = String;

/// Store-allocated identifier for a room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomStatus {
    /// Created by the host; no guest seated yet.
    WaitingForGuest,
    /// Both seats taken, gameplay mutations allowed.
    InProgress,
    /// The current match reached a terminal result. A match reset returns
    /// the room to `InProgress`; nothing returns it to `WaitingForGuest`.
    Finished,
}

/// The single source of truth for a remote match.
///
/// Exactly one record exists per room code. Clients never mutate a copy and
/// treat it as final; every change flows through the room service and comes
/// back as a fresh record with a higher `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RoomRecord {
    /// Room identifier.
    id: RoomId,
    /// Human-shareable join code.
    code: RoomCode,
    /// Monotone write counter; bumped on every committed mutation.
    version: u64,
    /// Identity seated as player one.
    host: ParticipantId,
    /// Identity seated as player two, absent until someone joins.
    guest: Option<ParticipantId>,
    /// The board.
    grid: Grid,
    /// Whose turn it is. Frozen once the match ends.
    current_player: Player,
    /// Outcome of the current match.
    result: MatchResult,
    /// Winning cells, present only for a won match.
    winning_line: Option<WinningLine>,
    /// Most recently placed disc.
    last_move: Option<LastMove>,
    /// Win counters, preserved across match resets.
    scores: ScoreTally,
    /// Lifecycle state.
    status: RoomStatus,
    /// When the room was created.
    created_at: DateTime<Utc>,
    /// When the record was last committed.
    updated_at: DateTime<Utc>,
}

impl RoomRecord {
    /// Creates the record for a freshly hosted room.
    pub(crate) fn new(id: RoomId, code: RoomCode, host: ParticipantId) -> Self {
        let now = Utc::now();
        Self {
            id,
            code,
            version: 1,
            host,
            guest: None,
            grid: Grid::new(),
            current_player: Player::One,
            result: MatchResult::InProgress,
            winning_line: None,
            last_move: None,
            scores: ScoreTally::default(),
            status: RoomStatus::WaitingForGuest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the seat the identity holds, if any.
    pub fn seat_of(&self, participant: &str) -> Option<Player> {
        if self.host == participant {
            Some(Player::One)
        } else if self.guest.as_deref() == Some(participant) {
            Some(Player::Two)
        } else {
            None
        }
    }

    /// Whether the identity holds either seat.
    pub fn is_participant(&self, participant: &str) -> bool {
        self.seat_of(participant).is_some()
    }

    // Mutators are crate-private: all writes go through the store's atomic
    // update primitive, never through ad-hoc field pokes by callers.

    pub(crate) fn seat_guest(&mut self, guest: ParticipantId) {
        self.guest = Some(guest);
        self.status = RoomStatus::InProgress;
    }

    pub(crate) fn set_board(
        &mut self,
        grid: Grid,
        last_move: LastMove,
        result: MatchResult,
        winning_line: Option<WinningLine>,
    ) {
        self.grid = grid;
        self.last_move = Some(last_move);
        self.result = result;
        self.winning_line = winning_line;
    }

    pub(crate) fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    pub(crate) fn set_status(&mut self, status: RoomStatus) {
        self.status = status;
    }

    pub(crate) fn record_win(&mut self, winner: Player) {
        self.scores.record_win(winner);
    }

    pub(crate) fn clear_match(&mut self) {
        self.grid = Grid::new();
        self.current_player = Player::One;
        self.result = MatchResult::InProgress;
        self.winning_line = None;
        self.last_move = None;
        self.status = RoomStatus::InProgress;
    }

    pub(crate) fn reset_scores(&mut self) {
        self.scores.reset();
    }

    pub(crate) fn bump_version(&mut self, at: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = at;
    }
}
