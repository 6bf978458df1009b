//! Error types for the session layer.

use codenames_protocol::ProtocolError;
use codenames_room::RoomError;
use codenames_transport::TransportError;

/// Errors that end a connection session.
///
/// Only the outbound side and the initial join produce these. Problems on
/// the inbound side (bad frames, a dead socket, silence) end the session
/// as an ordinary leave instead; see [`SessionEnd`](crate::SessionEnd).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Writing to the peer failed or took too long.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A queued frame could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The room refused or is gone.
    #[error("room error: {0}")]
    Room(#[from] RoomError),
}
