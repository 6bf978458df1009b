//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and the text that
//! travels in WebSocket frames. The session layer doesn't care HOW a
//! snapshot becomes text; it just needs something that implements the
//! [`Codec`] trait.
//!
//! Browsers speak JSON, so [`JsonCodec`] is the only implementation today.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to text and decode text back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → safe to share between threads (the same codec value
///   is used by every connection task).
/// - `'static` → the codec owns everything it needs, so it can live inside
///   long-running spawned tasks.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// doesn't borrow from the input frame. The frame buffer can be dropped
/// as soon as decoding finishes.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or doesn't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use codenames_protocol::{Codec, JsonCodec, Message, MessageKind, PlayerId};
///
/// let codec = JsonCodec;
/// let msg = Message::new(PlayerId::from("p1"), "hello", MessageKind::Chat);
///
/// let text = codec.encode(&msg).unwrap();
/// let decoded: Message = codec.decode(&text).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
