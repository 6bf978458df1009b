//! In-process loopback connection.
//!
//! [`pair`] returns the two server-side halves plus a [`Peer`] that plays
//! the client: whatever the peer pushes arrives at the [`MemorySource`],
//! and whatever is written to the [`MemorySink`] shows up in the peer's
//! outbound queue.

use tokio::sync::mpsc;

use crate::{ConnectionId, FrameSink, FrameSource, InboundFrame, TransportError};

/// A frame the server wrote, as seen by the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// A text frame.
    Text(String),
    /// A liveness ping.
    Ping,
    /// A close frame.
    Close {
        /// Close status code.
        code: u16,
        /// Close reason.
        reason: String,
    },
}

/// The client end of a loopback connection.
pub struct Peer {
    /// Frames to deliver to the server. Dropping it closes the source.
    pub inbound: mpsc::UnboundedSender<InboundFrame>,
    /// Frames the server wrote.
    pub outbound: mpsc::UnboundedReceiver<OutboundFrame>,
}

impl Peer {
    /// Sends a text frame to the server.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.inbound.send(InboundFrame::Text(text.into())).is_ok()
    }
}

/// Write half backed by a channel.
pub struct MemorySink {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<OutboundFrame>,
}

impl MemorySink {
    /// The connection this half belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    fn push(&self, frame: OutboundFrame) -> Result<(), TransportError> {
        self.tx
            .send(frame)
            .map_err(|_| TransportError::ConnectionClosed("peer dropped".into()))
    }
}

impl FrameSink for MemorySink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.push(OutboundFrame::Text(text))
    }

    async fn send_ping(&mut self) -> Result<(), TransportError> {
        self.push(OutboundFrame::Ping)
    }

    async fn send_close(
        &mut self,
        code: u16,
        reason: &str,
    ) -> Result<(), TransportError> {
        self.push(OutboundFrame::Close {
            code,
            reason: reason.to_string(),
        })
    }
}

/// Read half backed by a channel.
pub struct MemorySource {
    id: ConnectionId,
    rx: mpsc::UnboundedReceiver<InboundFrame>,
}

impl MemorySource {
    /// The connection this half belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl FrameSource for MemorySource {
    async fn recv(&mut self) -> Result<Option<InboundFrame>, TransportError> {
        Ok(self.rx.recv().await)
    }
}

/// Creates a connected loopback pair with a fresh [`ConnectionId`].
pub fn pair() -> (ConnectionId, MemorySink, MemorySource, Peer) {
    let id = ConnectionId::next();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    (
        id,
        MemorySink { id, tx: out_tx },
        MemorySource { id, rx: in_rx },
        Peer {
            inbound: in_tx,
            outbound: out_rx,
        },
    )
}
