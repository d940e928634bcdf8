//! HTTP surface over the room service.
//!
//! A thin rendering-layer collaborator: JSON bodies in, full room records
//! out, and a server-sent-events stream per room that relays the change
//! feed. No game or room decision is made here.

use crate::room::{ParticipantId, RoomCode, RoomCodeError, RoomError, RoomId, RoomRecord, RoomService};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_more::{Display, Error, From};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, instrument, warn};

/// Request for creating a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Identity of the hosting participant.
    pub player_id: ParticipantId,
}

/// Request for joining a room by code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    /// The shared room code, as typed by the guest.
    pub code: String,
    /// Identity of the joining participant.
    pub player_id: ParticipantId,
}

/// Request for dropping a disc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Identity of the moving participant.
    pub player_id: ParticipantId,
    /// Column to drop into (0-6, left to right).
    pub column: usize,
}

/// Request for leaving (and destroying) a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRoomRequest {
    /// Identity of the leaving participant.
    pub player_id: ParticipantId,
}

/// Error payload returned to HTTP callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable rejection reason.
    pub error: String,
}

/// Rejections surfaced by the HTTP layer.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ApiError {
    /// A room operation was rejected.
    Room(RoomError),
    /// The submitted room code is not well-formed.
    Code(RoomCodeError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Room(RoomError::RoomNotFound) => StatusCode::NOT_FOUND,
            ApiError::Room(
                RoomError::RoomFull
                | RoomError::NotYourTurn
                | RoomError::MatchAlreadyOver
                | RoomError::RoomNotInProgress,
            ) => StatusCode::CONFLICT,
            ApiError::Room(RoomError::ColumnFull(_) | RoomError::InvalidColumn { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Room(RoomError::CodeAllocation) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Code(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        debug!(status = %self.status(), error = %body.error, "Request rejected");
        (self.status(), Json(body)).into_response()
    }
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: RoomService,
}

/// Builds the HTTP router over the given service.
#[instrument(skip(service))]
pub fn router(service: RoomService) -> Router {
    info!("Building HTTP router");
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/join", post(join_room))
        .route("/rooms/{id}", get(get_room))
        .route("/rooms/{id}/moves", post(make_move))
        .route("/rooms/{id}/reset-match", post(reset_match))
        .route("/rooms/{id}/reset-scores", post(reset_scores))
        .route("/rooms/{id}/leave", post(leave_room))
        .route("/rooms/{id}/events", get(room_events))
        .with_state(AppState { service })
}

#[instrument(skip(state, req), fields(player_id = %req.player_id))]
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<RoomRecord>, ApiError> {
    let record = state.service.create_room(req.player_id)?;
    info!(room_id = %record.id(), code = %record.code(), "Room created over HTTP");
    Ok(Json(record))
}

#[instrument(skip(state, req), fields(code = %req.code, player_id = %req.player_id))]
async fn join_room(
    State(state): State<AppState>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<RoomRecord>, ApiError> {
    let code = RoomCode::parse(&req.code).map_err(ApiError::Code)?;
    let record = state.service.join_room(&code, req.player_id)?;
    Ok(Json(record))
}

#[instrument(skip(state))]
async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RoomRecord>, ApiError> {
    let record = state
        .service
        .room(RoomId(id))
        .ok_or(RoomError::RoomNotFound)
        .map_err(ApiError::Room)?;
    Ok(Json(record))
}

#[instrument(skip(state, req), fields(player_id = %req.player_id, column = req.column))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<RoomRecord>, ApiError> {
    let record = state
        .service
        .apply_move(RoomId(id), &req.player_id, req.column)?;
    Ok(Json(record))
}

#[instrument(skip(state))]
async fn reset_match(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RoomRecord>, ApiError> {
    let record = state.service.reset_match(RoomId(id))?;
    Ok(Json(record))
}

#[instrument(skip(state))]
async fn reset_scores(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RoomRecord>, ApiError> {
    let record = state.service.reset_scores(RoomId(id))?;
    Ok(Json(record))
}

#[instrument(skip(state, req), fields(player_id = %req.player_id))]
async fn leave_room(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<LeaveRoomRequest>,
) -> Result<StatusCode, ApiError> {
    state.service.leave_room(RoomId(id), &req.player_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn room_events(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let receiver = state.service.subscribe(RoomId(id))?;
    info!(room_id = id, "SSE subscriber attached");

    let stream = futures::stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(record) => match Event::default().json_data(record.as_ref()) {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(error) => {
                        warn!(%error, "Failed to encode room snapshot");
                        continue;
                    }
                },
                // A lagging subscriber lost old snapshots; the next one is a
                // full replacement, so just keep reading.
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "SSE subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
