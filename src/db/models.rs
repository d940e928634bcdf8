//! Database models and domain types for the match-history ledger.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use strum::{Display, EnumString};

use crate::db::{DbError, schema};
use crate::games::connect_four::{MatchResult, Player};

/// A finished match as stored in the ledger.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::match_records)]
pub struct MatchRecord {
    id: i32,
    room_code: String,
    outcome: String,
    moves_count: i32,
    finished_at: NaiveDateTime,
}

impl MatchRecord {
    /// Parses the stored outcome string into a [`MatchOutcome`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid outcome value.
    pub fn parse_outcome(&self) -> Result<MatchOutcome, DbError> {
        self.outcome
            .parse()
            .map_err(|_| DbError::new(format!("Invalid outcome: '{}'", self.outcome)))
    }
}

/// Insertable model for recording a newly finished match.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::match_records)]
pub struct NewMatchRecord {
    room_code: String,
    outcome: String,
    moves_count: i32,
}

/// How a match ended, as persisted in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum MatchOutcome {
    /// Player one connected four.
    #[strum(serialize = "p1_win")]
    PlayerOneWin,
    /// Player two connected four.
    #[strum(serialize = "p2_win")]
    PlayerTwoWin,
    /// Top row filled with no winner.
    #[strum(serialize = "draw")]
    Draw,
}

impl MatchOutcome {
    /// Classifies a terminal match result. Returns `None` for a match that
    /// is still in progress, which has no business in the ledger.
    pub fn from_result(result: MatchResult) -> Option<Self> {
        match result {
            MatchResult::WonBy(Player::One) => Some(Self::PlayerOneWin),
            MatchResult::WonBy(Player::Two) => Some(Self::PlayerTwoWin),
            MatchResult::Draw => Some(Self::Draw),
            MatchResult::InProgress => None,
        }
    }
}

/// Aggregated outcome counts for one room code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct MatchSummary {
    /// Matches recorded.
    total: i64,
    /// Wins by player one.
    player_one_wins: i64,
    /// Wins by player two.
    player_two_wins: i64,
    /// Draws.
    draws: i64,
}

impl MatchSummary {
    pub(crate) fn count(&mut self, outcome: MatchOutcome) {
        self.total += 1;
        match outcome {
            MatchOutcome::PlayerOneWin => self.player_one_wins += 1,
            MatchOutcome::PlayerTwoWin => self.player_two_wins += 1,
            MatchOutcome::Draw => self.draws += 1,
        }
    }
}
