//! Database persistence layer for the match-history ledger.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{MatchOutcome, MatchRecord, MatchSummary, NewMatchRecord};
pub use repository::{MIGRATIONS, MatchRepository};
