//! HTTP handlers: room creation and the WebSocket join.
//!
//! Both room routes take the same three query parameters (`roomid`,
//! `nickname`, `playerid`) and answer missing ones the same way. A join
//! for an unknown room is still upgraded, then closed straight away with
//! the reason "Room not found", because browsers can't read the body of a
//! failed upgrade.

use std::sync::Arc;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use codenames_protocol::{ApiResponse, Codec, Player, RoomId};
use codenames_room::{fetch_board_words, RoomError, RoomHandle, WordSource};
use codenames_session::{ConnectionSession, SessionConfig};
use codenames_transport::{split, FrameSink, CLOSE_NORMAL};
use serde::Deserialize;

use crate::server::ServerState;

/// Reply for a create or join that names no room or no player.
const MISSING_PARAMS: &str = "Room or User is not mentioned";

/// Close reason sent to a client that joined an unknown room.
pub const ROOM_NOT_FOUND: &str = "Room not found";

/// Query parameters shared by `/room/create` and `/room/join`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoomQuery {
    roomid: Option<String>,
    nickname: Option<String>,
    playerid: Option<String>,
}

impl RoomQuery {
    /// The room and player named by the query, if all three parameters
    /// are present and non-empty.
    fn parts(self) -> Option<(RoomId, Player)> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let room_id = present(self.roomid)?;
        let nickname = present(self.nickname)?;
        let player_id = present(self.playerid)?;
        Some((RoomId(room_id), Player::new(player_id, nickname)))
    }
}

type Reply = (StatusCode, Json<ApiResponse>);

fn missing_params() -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(MISSING_PARAMS)),
    )
}

/// `GET /`
pub(crate) async fn root() -> &'static str {
    "Welcome to Codenames Backend"
}

/// `GET /room/create?roomid=&nickname=&playerid=`
///
/// Fetches board words, then registers the room. Nothing is registered if
/// any step fails.
pub(crate) async fn create_room<W, C>(
    State(state): State<Arc<ServerState<W, C>>>,
    Query(query): Query<RoomQuery>,
) -> Reply
where
    W: WordSource,
    C: Codec,
{
    let Some((room_id, owner)) = query.parts() else {
        return missing_params();
    };

    let words = match fetch_board_words(&state.words).await {
        Ok(words) => words,
        Err(e) => {
            tracing::warn!(%room_id, error = %e, "word fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("failed to fetch words: {e}"))),
            );
        }
    };

    let created = state
        .lobby
        .lock()
        .await
        .create_room(room_id.clone(), owner, &words);

    match created {
        Ok(_) => (StatusCode::OK, Json(ApiResponse::ok("Room created"))),
        Err(e @ RoomError::AlreadyExists(_)) => {
            (StatusCode::CONFLICT, Json(ApiResponse::error(e.to_string())))
        }
        Err(e) => {
            tracing::warn!(%room_id, error = %e, "room creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}

/// `GET /room/join?roomid=&nickname=&playerid=` (WebSocket upgrade)
pub(crate) async fn join_room<W, C>(
    State(state): State<Arc<ServerState<W, C>>>,
    Query(query): Query<RoomQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response
where
    W: WordSource,
    C: Codec,
{
    let Some((room_id, player)) = query.parts() else {
        return missing_params().into_response();
    };
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    let room = state.lobby.lock().await.find_room(&room_id);
    let codec = Arc::clone(&state.codec);
    let config = state.session_config.clone();

    ws.on_upgrade(move |socket| handle_socket(socket, room, player, codec, config))
}

/// Runs one upgraded connection to completion.
async fn handle_socket<C: Codec>(
    socket: WebSocket,
    room: Result<RoomHandle, RoomError>,
    player: Player,
    codec: Arc<C>,
    config: SessionConfig,
) {
    let (conn_id, mut sink, source) = split(socket);

    let room = match room {
        Ok(room) => room,
        Err(e) => {
            tracing::debug!(%conn_id, player_id = %player.id, error = %e, "join refused");
            if let Err(e) = sink.send_close(CLOSE_NORMAL, ROOM_NOT_FOUND).await {
                tracing::debug!(%conn_id, error = %e, "close frame not delivered");
            }
            return;
        }
    };

    let room_id = room.room_id().clone();
    let session = ConnectionSession::new(room, player, conn_id, codec, config);
    match session.run(sink, source).await {
        Ok(end) => tracing::debug!(%room_id, %conn_id, reason = ?end, "connection finished"),
        Err(e) => tracing::warn!(%room_id, %conn_id, error = %e, "session failed"),
    }
}
