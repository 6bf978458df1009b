//! Frame-level connection abstraction for the Codenames room server.
//!
//! A connection is split into two halves so the inbound and outbound
//! pumps can run as independent tasks:
//!
//! - [`FrameSource`]: yields frames the peer sent
//! - [`FrameSink`]: writes text, pings, and close frames to the peer
//!
//! # Feature Flags
//!
//! - `websocket` (default): halves backed by an upgraded axum WebSocket
//!
//! The [`memory`] module provides an in-process loopback pair, used by
//! tests and local bots that don't need a socket.

mod error;
pub mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{split, WebSocketSink, WebSocketSource};

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates a process-unique `ConnectionId`.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A frame received from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// A text frame.
    Text(String),
    /// A binary frame.
    Binary(Vec<u8>),
    /// A liveness probe from the peer.
    Ping,
    /// The peer's answer to one of our pings.
    Pong,
}

/// The write half of a connection.
pub trait FrameSink: Send + 'static {
    /// Sends one text frame.
    fn send_text(
        &mut self,
        text: String,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Sends a liveness ping.
    fn send_ping(
        &mut self,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Sends a close frame with a status code and reason.
    fn send_close(
        &mut self,
        code: u16,
        reason: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// The read half of a connection.
pub trait FrameSource: Send + 'static {
    /// Receives the next frame from the peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &mut self,
    ) -> impl Future<Output = Result<Option<InboundFrame>, TransportError>> + Send;
}

/// Close code for a normal, intentional close.
pub const CLOSE_NORMAL: u16 = 1000;
