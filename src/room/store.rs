//! In-process room record store.
//!
//! The store is the persistence collaborator realized in memory: one record
//! per room behind a single mutex, with a conditional-update primitive that
//! runs validate-and-mutate as one indivisible step. No caller ever reads a
//! record, computes a new value, and writes it back as two separate steps --
//! that separable pattern is exactly the race this layer exists to close.

use crate::room::code::RoomCode;
use crate::room::error::RoomError;
use crate::room::record::{ParticipantId, RoomId, RoomRecord};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

#[derive(Debug, Default)]
struct StoreInner {
    rooms: HashMap<RoomId, RoomRecord>,
    codes: HashMap<RoomCode, RoomId>,
    next_id: u64,
}

/// Thread-safe store of room records, shared by cloning.
#[derive(Debug, Clone, Default)]
pub struct RoomStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl RoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new record under the given code, or reports that the code
    /// is already claimed so the caller can retry with a fresh one.
    ///
    /// The collision check and the insert happen under one lock acquisition;
    /// two hosts racing for the same code cannot both win it.
    #[instrument(skip(self))]
    pub fn insert_with_code(
        &self,
        code: RoomCode,
        host: ParticipantId,
    ) -> Result<RoomRecord, CodeTaken> {
        let mut inner = self.inner.lock().expect("room store poisoned");

        if inner.codes.contains_key(&code) {
            warn!(code = %code, "Room code collision");
            return Err(CodeTaken);
        }

        inner.next_id += 1;
        let id = RoomId(inner.next_id);
        let record = RoomRecord::new(id, code.clone(), host);
        inner.codes.insert(code, id);
        inner.rooms.insert(id, record.clone());
        debug!(room_id = %id, "Room record inserted");
        Ok(record)
    }

    /// Returns a snapshot of the record with the given id.
    pub fn get(&self, id: RoomId) -> Option<RoomRecord> {
        let inner = self.inner.lock().expect("room store poisoned");
        inner.rooms.get(&id).cloned()
    }

    /// Returns a snapshot of the record with the given code.
    pub fn get_by_code(&self, code: &RoomCode) -> Option<RoomRecord> {
        let inner = self.inner.lock().expect("room store poisoned");
        let id = inner.codes.get(code)?;
        inner.rooms.get(id).cloned()
    }

    /// Atomically applies `mutate` to the stored record.
    ///
    /// The closure runs on a copy of the record while the store lock is
    /// held. Only when it returns `Ok` does the copy replace the stored
    /// record, with the version bumped and `updated_at` refreshed; on `Err`
    /// the stored record is left byte-for-byte untouched. This is the atomic
    /// conditional update every mutating room operation is built on.
    ///
    /// # Errors
    ///
    /// [`RoomError::RoomNotFound`] for an unknown id, otherwise whatever
    /// `mutate` returns.
    #[instrument(skip(self, mutate))]
    pub fn update(
        &self,
        id: RoomId,
        mutate: impl FnOnce(&mut RoomRecord) -> Result<(), RoomError>,
    ) -> Result<RoomRecord, RoomError> {
        let mut inner = self.inner.lock().expect("room store poisoned");

        let current = inner.rooms.get(&id).ok_or(RoomError::RoomNotFound)?;
        let mut candidate = current.clone();
        mutate(&mut candidate)?;
        candidate.bump_version(Utc::now());

        inner.rooms.insert(id, candidate.clone());
        debug!(room_id = %id, version = *candidate.version(), "Room record committed");
        Ok(candidate)
    }

    /// Removes the record and its code mapping.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomNotFound`] if no record matches.
    #[instrument(skip(self))]
    pub fn remove(&self, id: RoomId) -> Result<RoomRecord, RoomError> {
        let mut inner = self.inner.lock().expect("room store poisoned");
        let record = inner.rooms.remove(&id).ok_or(RoomError::RoomNotFound)?;
        inner.codes.remove(record.code());
        debug!(room_id = %id, "Room record removed");
        Ok(record)
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("room store poisoned").rooms.len()
    }

    /// Whether the store holds no rooms.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Marker error: the candidate room code is already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTaken;
