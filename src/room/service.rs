//! Authoritative mutator of room records.
//!
//! Every state-changing operation validates against the current stored
//! record and commits inside the store's atomic update, so two independent
//! remote clients can never interleave a read-decide-write. Committed
//! records fan out to subscribers through a per-room broadcast feed; the
//! feed is read-only replication and never decides a write.

use crate::db::MatchRepository;
use crate::games::connect_four::{COLS, MatchResult, resolve_drop};
use crate::room::code::RoomCode;
use crate::room::error::RoomError;
use crate::room::record::{ParticipantId, RoomId, RoomRecord, RoomStatus};
use crate::room::store::RoomStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// How many snapshots a slow subscriber may fall behind before the feed
/// starts dropping its oldest entries. Snapshots are full replacements, so
/// a lagging client recovers by applying the next one it receives.
const FEED_CAPACITY: usize = 32;

/// How many fresh codes to try when creation keeps colliding.
const CODE_RETRIES: usize = 8;

/// Room synchronization service: atomic operations over room records plus a
/// change-notification feed per room.
#[derive(Debug, Clone)]
pub struct RoomService {
    store: RoomStore,
    feeds: Arc<Mutex<HashMap<RoomId, broadcast::Sender<Arc<RoomRecord>>>>>,
    history: Option<MatchRepository>,
}

impl RoomService {
    /// Creates a service over the given store.
    #[instrument(skip(store))]
    pub fn new(store: RoomStore) -> Self {
        info!("Creating room service");
        Self {
            store,
            feeds: Arc::new(Mutex::new(HashMap::new())),
            history: None,
        }
    }

    /// Creates a service that records finished matches in the given ledger.
    #[instrument(skip(store, history))]
    pub fn with_history(store: RoomStore, history: MatchRepository) -> Self {
        info!("Creating room service with match history");
        Self {
            store,
            feeds: Arc::new(Mutex::new(HashMap::new())),
            history: Some(history),
        }
    }

    /// Allocates a new room hosted by the given identity.
    ///
    /// The generated code is checked against live rooms; a collision is
    /// retried with a fresh code rather than overwriting the existing room.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::CodeAllocation`] if every retry collided.
    #[instrument(skip(self))]
    pub fn create_room(&self, host: ParticipantId) -> Result<RoomRecord, RoomError> {
        for _ in 0..CODE_RETRIES {
            let code = RoomCode::generate(&mut rand::rng());
            match self.store.insert_with_code(code, host.clone()) {
                Ok(record) => {
                    info!(room_id = %record.id(), code = %record.code(), "Room created");
                    self.feed_for(*record.id());
                    return Ok(record);
                }
                Err(_) => continue,
            }
        }
        warn!("Room code allocation exhausted retries");
        Err(RoomError::CodeAllocation)
    }

    /// Seats the joiner as guest, atomically.
    ///
    /// Re-joining with an identity that already holds the host or guest
    /// seat is idempotent: it returns the current record without mutating
    /// anything, so reconnects never lose a seat or emit a feed event.
    ///
    /// # Errors
    ///
    /// [`RoomError::RoomNotFound`] for an unknown code, [`RoomError::RoomFull`]
    /// when a different guest is already seated.
    #[instrument(skip(self))]
    pub fn join_room(
        &self,
        code: &RoomCode,
        joiner: ParticipantId,
    ) -> Result<RoomRecord, RoomError> {
        let current = self.store.get_by_code(code).ok_or(RoomError::RoomNotFound)?;
        let id = *current.id();

        // Idempotent re-join. The host seat never changes after creation,
        // so this check cannot go stale before the atomic update below.
        if current.is_participant(&joiner) {
            debug!(room_id = %id, "Identity already seated, join is a no-op");
            return Ok(current);
        }

        let record = self.store.update(id, |room| match room.guest() {
            // A concurrent duplicate join by the same identity landed first.
            Some(guest) if *guest == joiner => Ok(()),
            Some(_) => Err(RoomError::RoomFull),
            None => {
                room.seat_guest(joiner.clone());
                Ok(())
            }
        })?;

        info!(room_id = %id, status = %record.status(), "Guest joined");
        self.publish(&record);
        Ok(record)
    }

    /// Applies one move for the given identity, atomically.
    ///
    /// Validation (lifecycle, terminal result, turn ownership) and the
    /// engine transition run against the same stored record inside one
    /// indivisible update. Of two near-simultaneous moves issued against
    /// one record version, exactly one commits; the other fails its check
    /// against the already-advanced record.
    ///
    /// # Errors
    ///
    /// Any [`RoomError`] variant from the taxonomy; the stored record is
    /// untouched on every failure.
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        id: RoomId,
        mover: &ParticipantId,
        column: usize,
    ) -> Result<RoomRecord, RoomError> {
        if column >= COLS {
            return Err(RoomError::InvalidColumn { column });
        }

        let record = self.store.update(id, |room| {
            if *room.status() != RoomStatus::InProgress {
                return Err(RoomError::RoomNotInProgress);
            }
            if room.result().is_terminal() {
                return Err(RoomError::MatchAlreadyOver);
            }
            let seat = room.seat_of(mover).ok_or(RoomError::NotYourTurn)?;
            if seat != *room.current_player() {
                return Err(RoomError::NotYourTurn);
            }

            let outcome = resolve_drop(room.grid(), column, seat)?;
            room.set_board(
                outcome.grid,
                outcome.landed,
                outcome.result,
                outcome.winning_line,
            );
            match outcome.result {
                MatchResult::WonBy(winner) => {
                    room.record_win(winner);
                    room.set_status(RoomStatus::Finished);
                }
                MatchResult::Draw => {
                    room.set_status(RoomStatus::Finished);
                }
                MatchResult::InProgress => {
                    room.set_current_player(seat.opponent());
                }
            }
            Ok(())
        })?;

        info!(
            room_id = %id,
            column,
            result = ?record.result(),
            version = *record.version(),
            "Move committed"
        );
        if record.result().is_terminal() {
            self.record_history(&record);
        }
        self.publish(&record);
        Ok(record)
    }

    /// Starts a new match in the room, preserving the score tally.
    ///
    /// # Errors
    ///
    /// [`RoomError::RoomNotInProgress`] while the room still waits for a
    /// guest; [`RoomError::RoomNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn reset_match(&self, id: RoomId) -> Result<RoomRecord, RoomError> {
        let record = self.store.update(id, |room| {
            if *room.status() == RoomStatus::WaitingForGuest {
                return Err(RoomError::RoomNotInProgress);
            }
            room.clear_match();
            Ok(())
        })?;

        info!(room_id = %id, version = *record.version(), "Match reset");
        self.publish(&record);
        Ok(record)
    }

    /// Zeroes the room's score tally; the match in progress is untouched.
    ///
    /// # Errors
    ///
    /// [`RoomError::RoomNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn reset_scores(&self, id: RoomId) -> Result<RoomRecord, RoomError> {
        let record = self.store.update(id, |room| {
            room.reset_scores();
            Ok(())
        })?;

        info!(room_id = %id, version = *record.version(), "Scores reset");
        self.publish(&record);
        Ok(record)
    }

    /// Destroys the room on behalf of a seated participant.
    ///
    /// The record is removed and the feed closed; subscribers observe the
    /// channel closing rather than a final snapshot.
    ///
    /// # Errors
    ///
    /// [`RoomError::RoomNotFound`] for an unknown id, and for an identity
    /// holding neither seat, so outsiders cannot probe or destroy rooms.
    #[instrument(skip(self))]
    pub fn leave_room(&self, id: RoomId, participant: &ParticipantId) -> Result<(), RoomError> {
        let record = self.store.get(id).ok_or(RoomError::RoomNotFound)?;
        if !record.is_participant(participant) {
            return Err(RoomError::RoomNotFound);
        }

        self.store.remove(id)?;
        self.feeds.lock().expect("feed map poisoned").remove(&id);
        info!(room_id = %id, "Room destroyed by participant leave");
        Ok(())
    }

    /// Subscribes to the room's change feed.
    ///
    /// Every committed write is delivered to every subscriber, including
    /// the writer, as a full-snapshot record. Delivery is at-least-once
    /// from the subscriber's perspective; receivers that fall behind see
    /// `Lagged` and pick up from the newest snapshot.
    ///
    /// # Errors
    ///
    /// [`RoomError::RoomNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn subscribe(&self, id: RoomId) -> Result<broadcast::Receiver<Arc<RoomRecord>>, RoomError> {
        if self.store.get(id).is_none() {
            return Err(RoomError::RoomNotFound);
        }
        Ok(self.feed_for(id).subscribe())
    }

    /// Returns a snapshot of the room, if it exists.
    pub fn room(&self, id: RoomId) -> Option<RoomRecord> {
        self.store.get(id)
    }

    /// Returns a snapshot of the room with the given code, if it exists.
    pub fn room_by_code(&self, code: &RoomCode) -> Option<RoomRecord> {
        self.store.get_by_code(code)
    }

    fn feed_for(&self, id: RoomId) -> broadcast::Sender<Arc<RoomRecord>> {
        let mut feeds = self.feeds.lock().expect("feed map poisoned");
        feeds
            .entry(id)
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .clone()
    }

    fn publish(&self, record: &RoomRecord) {
        let sender = self.feed_for(*record.id());
        // Send only fails when nobody is subscribed, which is fine.
        let delivered = sender.send(Arc::new(record.clone())).unwrap_or(0);
        debug!(
            room_id = %record.id(),
            version = *record.version(),
            subscribers = delivered,
            "Snapshot published"
        );
    }

    fn record_history(&self, record: &RoomRecord) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(error) = history.record_finished(record) {
            // History is an observability ledger; a write failure must not
            // fail the move that was already committed.
            warn!(room_id = %record.id(), %error, "Failed to record match history");
        }
    }
}
