//! Remote-match rooms: canonical state, atomic synchronization, projection.

mod code;
mod error;
mod projection;
mod record;
mod service;
mod store;

pub use code::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN, RoomCode, RoomCodeError};
pub use error::RoomError;
pub use projection::{RoomFollower, RoomView};
pub use record::{ParticipantId, RoomId, RoomRecord, RoomStatus};
pub use service::RoomService;
pub use store::{CodeTaken, RoomStore};
