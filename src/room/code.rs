//! Human-shareable room codes.

use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters a room code may contain. Visually confusable symbols
/// (`0`/`O`, `1`/`I`) are excluded so codes survive being read aloud or
/// copied by hand.
pub const ROOM_CODE_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a room code.
pub const ROOM_CODE_LEN: usize = 6;

/// Error returned when a string is not a well-formed room code.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RoomCodeError {
    /// The candidate has the wrong length.
    #[display("room code must be {expected} chars, got {found}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected candidate.
        found: usize,
    },
    /// The candidate contains a character outside the alphabet.
    #[display("invalid character '{ch}' at position {index}")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Its position in the candidate.
        index: usize,
    },
}

/// A validated six-character room code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses a candidate, uppercasing and trimming it first so codes typed
    /// by a guest tolerate sloppy input.
    ///
    /// # Errors
    ///
    /// Returns [`RoomCodeError`] if the normalized candidate has the wrong
    /// length or a character outside [`ROOM_CODE_ALPHABET`].
    pub fn parse(value: &str) -> Result<Self, RoomCodeError> {
        let normalized = value.trim().to_uppercase();
        if normalized.len() != ROOM_CODE_LEN {
            return Err(RoomCodeError::InvalidLength {
                expected: ROOM_CODE_LEN,
                found: normalized.len(),
            });
        }
        for (index, ch) in normalized.chars().enumerate() {
            if !ROOM_CODE_ALPHABET.contains(ch) {
                return Err(RoomCodeError::InvalidCharacter { ch, index });
            }
        }
        Ok(Self(normalized))
    }

    /// Draws a fresh random code from the alphabet.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let alphabet: Vec<char> = ROOM_CODE_ALPHABET.chars().collect();
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = RoomCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = RoomCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}
