//! Fourline library - connect-four with server-synchronized rooms
//!
//! This library provides a pure connect-four rules engine and the room
//! machinery that lets two remote clients drive it safely.
//!
//! # Architecture
//!
//! - **Engine**: pure drop/win/draw functions over an immutable grid
//! - **Local**: sequential same-device match controller
//! - **Room**: canonical versioned room records, an atomic store, the
//!   synchronization service, and a per-room change feed
//! - **Projection**: per-client read model over received snapshots
//! - **Server**: axum HTTP surface with a server-sent-events feed
//! - **Db**: SQLite ledger of finished matches
//!
//! # Example
//!
//! ```
//! use fourline::{RoomService, RoomStore, RoomView};
//!
//! # fn example() -> Result<(), fourline::RoomError> {
//! let service = RoomService::new(RoomStore::new());
//!
//! let room = service.create_room("host".to_string())?;
//! let room = service.join_room(room.code(), "guest".to_string())?;
//!
//! // Host is player one and moves first.
//! let room = service.apply_move(*room.id(), &"host".to_string(), 3)?;
//! assert!(!RoomView::new(&room, "host").is_my_turn());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod games;
mod room;
mod server;

// Crate-level exports - Server configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Match history
pub use db::{DbError, MatchOutcome, MatchRecord, MatchRepository, MatchSummary, NewMatchRecord};

// Crate-level exports - HTTP surface
pub use server::{
    ApiError, CreateRoomRequest, ErrorBody, JoinRoomRequest, LeaveRoomRequest, MoveRequest, router,
};

// Crate-level exports - Rooms
pub use room::{
    CodeTaken, ParticipantId, ROOM_CODE_ALPHABET, ROOM_CODE_LEN, RoomCode, RoomCodeError,
    RoomError, RoomFollower, RoomId, RoomRecord, RoomService, RoomStatus, RoomStore, RoomView,
};

// Crate-level exports - Game types (connect-four)
pub use games::connect_four::{
    COLS, Cell, ColumnFull, Grid, LastMove, LocalMatch, LocalMoveError, MatchResult, MoveOutcome,
    Player, ROWS, ScoreTally, WIN_LENGTH, WinningLine, apply_drop, detect_win, is_full,
    resolve_drop,
};
