//! Database repository for the match-history ledger.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, MatchOutcome, MatchRecord, MatchSummary, NewMatchRecord, schema};
use crate::room::RoomRecord;

/// Schema migrations baked into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Repository over the match-history SQLite database.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    db_path: String,
}

impl MatchRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating MatchRepository");
        Ok(Self { db_path })
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration error: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Records a finished match from its room record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the room's match is not over or a database
    /// error occurs.
    #[instrument(skip(self, room), fields(room_code = %room.code(), result = ?room.result()))]
    pub fn record_finished(&self, room: &RoomRecord) -> Result<MatchRecord, DbError> {
        let outcome = MatchOutcome::from_result(*room.result())
            .ok_or_else(|| DbError::new("Match is still in progress"))?;
        let stat = NewMatchRecord::new(
            room.code().to_string(),
            outcome.to_string(),
            room.grid().occupied_cells() as i32,
        );
        self.record_match(stat)
    }

    /// Records a finished match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, stat), fields(room_code = %stat.room_code(), outcome = %stat.outcome()))]
    pub fn record_match(&self, stat: NewMatchRecord) -> Result<MatchRecord, DbError> {
        debug!("Recording match result");
        let mut conn = self.connection()?;

        let record = diesel::insert_into(schema::match_records::table)
            .values(&stat)
            .returning(MatchRecord::as_returning())
            .get_result(&mut conn)?;

        info!(
            record_id = record.id(),
            outcome = %record.outcome(),
            "Match result recorded"
        );
        Ok(record)
    }

    /// Gets all recorded matches for a room code, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn matches_for_room(&self, room_code: &str) -> Result<Vec<MatchRecord>, DbError> {
        debug!(room_code = %room_code, "Loading matches for room");
        let mut conn = self.connection()?;

        let records = schema::match_records::table
            .filter(schema::match_records::room_code.eq(room_code))
            .order(schema::match_records::finished_at.desc())
            .load::<MatchRecord>(&mut conn)?;

        info!(room_code = %room_code, count = records.len(), "Matches loaded");
        Ok(records)
    }

    /// Gets aggregated outcome counts for a room code.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn summary_for_room(&self, room_code: &str) -> Result<MatchSummary, DbError> {
        debug!(room_code = %room_code, "Computing match summary");
        let mut conn = self.connection()?;

        let records = schema::match_records::table
            .filter(schema::match_records::room_code.eq(room_code))
            .load::<MatchRecord>(&mut conn)?;

        let mut summary = MatchSummary::default();
        for record in &records {
            match record.parse_outcome() {
                Ok(outcome) => summary.count(outcome),
                Err(_) => {
                    warn!(outcome = %record.outcome(), record_id = record.id(), "Unknown outcome value")
                }
            }
        }

        info!(
            room_code = %room_code,
            total = summary.total(),
            "Match summary computed"
        );
        Ok(summary)
    }
}
