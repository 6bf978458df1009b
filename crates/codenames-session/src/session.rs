//! Connection sessions: the two pumps that sit between a socket and a room.
//!
//! A session runs two loops for one connection:
//!
//! ```text
//!   peer ──frames──→ inbound loop ──commands──→ room actor
//!   peer ←─frames─── outbound loop ←─queue───── room actor
//! ```
//!
//! The inbound loop owns the read half. It waits for frames under an idle
//! deadline that every frame renews (pongs included), turns each text
//! frame into a room command, and stops on silence, a dead socket or an
//! explicit goodbye. Whatever stops it, the session then tells the room
//! the connection left.
//!
//! The outbound loop owns the write half and the receiving end of the
//! connection's bounded queue. It never touches the room. When the room
//! drops the connection (on leave, or because the queue filled up), the
//! queue closes and the loop says goodbye with a close frame.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use codenames_protocol::{ClientAction, Codec, Player};
use codenames_room::{Outbound, RoomHandle};
use codenames_transport::{
    ConnectionId, FrameSink, FrameSource, InboundFrame, TransportError, CLOSE_NORMAL,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::{SessionConfig, SessionError};

// ---------------------------------------------------------------------------
// SessionEnd
// ---------------------------------------------------------------------------

/// Why a session's inbound loop stopped.
///
/// Every variant ends in the same place (the player leaves the room); the
/// variant only says what triggered it.
#[derive(Debug)]
pub enum SessionEnd {
    /// The peer closed the connection.
    PeerClosed,
    /// The peer sent the explicit leave frame.
    LeaveRequested,
    /// Nothing arrived within the idle timeout.
    IdleTimeout,
    /// Reading from the peer failed.
    Transport(TransportError),
    /// The room stopped accepting commands.
    RoomUnavailable,
}

// ---------------------------------------------------------------------------
// ConnectionSession
// ---------------------------------------------------------------------------

/// One player's connection to one room.
///
/// Build it once the room has been found, then hand [`run`](Self::run)
/// the two halves of the connection. `run` returns when the connection
/// is finished and the room has been told.
pub struct ConnectionSession<C: Codec> {
    room: RoomHandle,
    player: Player,
    conn_id: ConnectionId,
    codec: Arc<C>,
    config: SessionConfig,
}

impl<C: Codec> ConnectionSession<C> {
    /// Creates a session. `config` is passed through
    /// [`SessionConfig::validated`].
    pub fn new(
        room: RoomHandle,
        player: Player,
        conn_id: ConnectionId,
        codec: Arc<C>,
        config: SessionConfig,
    ) -> Self {
        Self {
            room,
            player,
            conn_id,
            codec,
            config: config.validated(),
        }
    }

    /// Joins the room, pumps frames both ways, then leaves.
    ///
    /// # Errors
    /// [`SessionError::Room`] if the room could not be joined. Once joined,
    /// the session always ends with `Ok`; outbound failures are logged.
    pub async fn run<S, R>(self, sink: S, mut source: R) -> Result<SessionEnd, SessionError>
    where
        S: FrameSink,
        R: FrameSource,
    {
        let Self {
            room,
            player,
            conn_id,
            codec,
            config,
        } = self;
        let room_id = room.room_id().clone();
        let player_id = player.id.clone();

        let (outbox, queue) = mpsc::channel(config.outbound_capacity);
        room.join(player, conn_id, outbox).await?;
        tracing::debug!(%room_id, %player_id, %conn_id, "session started");

        let outbound = tokio::spawn({
            let codec = Arc::clone(&codec);
            let config = config.clone();
            async move { run_outbound(sink, queue, codec.as_ref(), &config).await }
        });

        let end = run_inbound(
            &mut source,
            &room,
            conn_id,
            codec.as_ref(),
            config.idle_timeout,
        )
        .await;
        match &end {
            SessionEnd::Transport(e) => {
                tracing::debug!(%room_id, %player_id, %conn_id, error = %e, "read failed");
            }
            other => {
                tracing::debug!(
                    %room_id,
                    %player_id,
                    %conn_id,
                    reason = ?other,
                    "inbound loop ended"
                );
            }
        }

        if let Err(e) = room.leave(conn_id).await {
            tracing::debug!(%room_id, %conn_id, error = %e, "leave not delivered");
        }
        drop(room);

        match outbound.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(%room_id, %conn_id, error = %e, "outbound loop failed");
            }
            Err(e) => {
                tracing::error!(%room_id, %conn_id, error = %e, "outbound task panicked");
            }
        }

        tracing::info!(%room_id, %player_id, %conn_id, "session ended");
        Ok(end)
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Reads frames until the connection should end, forwarding each decoded
/// action to the room.
///
/// The idle deadline restarts with every frame received, whatever its
/// kind. Frames that don't decode are logged and skipped.
pub async fn run_inbound<R, C>(
    source: &mut R,
    room: &RoomHandle,
    conn_id: ConnectionId,
    codec: &C,
    idle_timeout: Duration,
) -> SessionEnd
where
    R: FrameSource,
    C: Codec,
{
    loop {
        let frame = match tokio::time::timeout(idle_timeout, source.recv()).await {
            Ok(Ok(Some(frame))) => frame,
            Ok(Ok(None)) => return SessionEnd::PeerClosed,
            Ok(Err(e)) => return SessionEnd::Transport(e),
            Err(_) => return SessionEnd::IdleTimeout,
        };

        let text = match frame {
            InboundFrame::Text(text) => text,
            InboundFrame::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    tracing::debug!(%conn_id, "skipping non-utf8 binary frame");
                    continue;
                }
            },
            InboundFrame::Ping | InboundFrame::Pong => continue,
        };

        let action = match ClientAction::parse(codec, &text) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "skipping malformed frame");
                continue;
            }
        };
        tracing::debug!(%conn_id, ?action, "client action");

        let sent = match action {
            ClientAction::Close => return SessionEnd::LeaveRequested,
            ClientAction::SetRole(role) => room.set_role(conn_id, role).await,
            ClientAction::GiveHint { word, count } => {
                room.give_hint(conn_id, word, count).await
            }
            ClientAction::RevealCard { index } => room.reveal_card(conn_id, index).await,
            ClientAction::Chat { text } => room.chat(conn_id, text).await,
        };
        if sent.is_err() {
            return SessionEnd::RoomUnavailable;
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Writes queued frames to the peer and pings it on a timer.
///
/// Each wakeup for the queue writes everything already waiting before
/// going back to sleep. Each write has its own `write_timeout`. When the
/// queue closes, a close frame is sent and the loop returns `Ok`.
///
/// # Errors
/// [`SessionError::Transport`] if a write fails or times out, and
/// [`SessionError::Protocol`] if a frame can't be encoded.
pub async fn run_outbound<S, C>(
    mut sink: S,
    mut queue: mpsc::Receiver<Outbound>,
    codec: &C,
    config: &SessionConfig,
) -> Result<(), SessionError>
where
    S: FrameSink,
    C: Codec,
{
    let period = config.ping_interval.max(Duration::from_millis(1));
    let mut ping = tokio::time::interval_at(Instant::now() + period, period);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            frame = queue.recv() => {
                let Some(frame) = frame else {
                    let closed = with_deadline(
                        config.write_timeout,
                        sink.send_close(CLOSE_NORMAL, ""),
                    )
                    .await;
                    if let Err(e) = closed {
                        tracing::debug!(error = %e, "close frame not delivered");
                    }
                    return Ok(());
                };

                write_frame(&mut sink, codec, &frame, config.write_timeout).await?;
                while let Ok(frame) = queue.try_recv() {
                    write_frame(&mut sink, codec, &frame, config.write_timeout).await?;
                }
            }
            _ = ping.tick() => {
                with_deadline(config.write_timeout, sink.send_ping()).await?;
            }
        }
    }
}

async fn write_frame<S, C>(
    sink: &mut S,
    codec: &C,
    frame: &Outbound,
    limit: Duration,
) -> Result<(), SessionError>
where
    S: FrameSink,
    C: Codec,
{
    let text = codec.encode(frame.as_ref())?;
    with_deadline(limit, sink.send_text(text)).await
}

async fn with_deadline<F>(limit: Duration, write: F) -> Result<(), SessionError>
where
    F: Future<Output = Result<(), TransportError>>,
{
    match tokio::time::timeout(limit, write).await {
        Ok(result) => result.map_err(SessionError::from),
        Err(_) => Err(TransportError::Timeout.into()),
    }
}
