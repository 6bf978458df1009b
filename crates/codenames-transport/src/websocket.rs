//! WebSocket halves over an upgraded axum socket.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};

use crate::{ConnectionId, FrameSink, FrameSource, InboundFrame, TransportError};

/// Splits an upgraded socket into independently owned halves that share
/// one fresh [`ConnectionId`].
pub fn split(socket: WebSocket) -> (ConnectionId, WebSocketSink, WebSocketSource) {
    let id = ConnectionId::next();
    let (sink, stream) = socket.split();
    tracing::debug!(%id, "split WebSocket connection");
    (id, WebSocketSink { id, inner: sink }, WebSocketSource { id, inner: stream })
}

/// The write half of a WebSocket connection.
pub struct WebSocketSink {
    id: ConnectionId,
    inner: SplitSink<WebSocket, Message>,
}

impl WebSocketSink {
    /// The connection this half belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&mut self, msg: Message) -> Result<(), TransportError> {
        self.inner.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }
}

impl FrameSink for WebSocketSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.send(Message::Text(text)).await
    }

    async fn send_ping(&mut self) -> Result<(), TransportError> {
        self.send(Message::Ping(Vec::new())).await
    }

    async fn send_close(
        &mut self,
        code: u16,
        reason: &str,
    ) -> Result<(), TransportError> {
        let frame = CloseFrame {
            code,
            reason: reason.to_string().into(),
        };
        self.send(Message::Close(Some(frame))).await
    }
}

/// The read half of a WebSocket connection.
pub struct WebSocketSource {
    id: ConnectionId,
    inner: SplitStream<WebSocket>,
}

impl WebSocketSource {
    /// The connection this half belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl FrameSource for WebSocketSource {
    async fn recv(&mut self) -> Result<Option<InboundFrame>, TransportError> {
        match self.inner.next().await {
            Some(Ok(Message::Text(text))) => Ok(Some(InboundFrame::Text(text))),
            Some(Ok(Message::Binary(data))) => {
                Ok(Some(InboundFrame::Binary(data)))
            }
            Some(Ok(Message::Ping(_))) => Ok(Some(InboundFrame::Ping)),
            Some(Ok(Message::Pong(_))) => Ok(Some(InboundFrame::Pong)),
            Some(Ok(Message::Close(_))) | None => Ok(None),
            Some(Err(e)) => Err(TransportError::ReceiveFailed(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, e),
            )),
        }
    }
}
