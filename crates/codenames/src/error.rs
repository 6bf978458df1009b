//! Unified error type for the Codenames server.

use codenames_protocol::ProtocolError;
use codenames_room::{RoomError, WordSourceError};
use codenames_session::SessionError;
use codenames_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `codenames` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CodenamesError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (join refused, write failed).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, already exists, bad board).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Board words could not be obtained.
    #[error(transparent)]
    Words(#[from] WordSourceError),

    /// Binding or serving the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
