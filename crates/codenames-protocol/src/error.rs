//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` always means the problem is in turning values into
//! frames or frames into values, never in networking or game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning text into a Rust value).
    ///
    /// Common causes: malformed JSON, missing required fields, or a
    /// field of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded, but doesn't make sense as a client action.
    ///
    /// For example, a `hint` without a `count`, or a `card-click` with a
    /// negative index.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
