//! Wire protocol for the Codenames room server.
//!
//! This crate defines the "language" that browsers and the server speak:
//!
//! - **Types** ([`GameState`], [`Card`], [`Message`], [`ServerMessage`],
//!   etc.): the structures that travel on the wire.
//! - **Client actions** ([`ClientFrame`], [`ClientAction`]): how a raw
//!   client frame becomes something the room can act on.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the room
//! (game rules). It doesn't know about connections or actors. It only
//! knows how to serialize and deserialize.
//!
//! ```text
//! Transport (frames) → Protocol (ClientAction) → Room (GameState)
//! ```

mod client;
mod codec;
mod error;
mod types;

pub use client::{ClientAction, ClientData, ClientFrame, CLOSE_REQUEST};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ApiResponse, Card, GameState, Hint, Label, Message, MessageKind, Player,
    PlayerId, Role, RoomId, Score, ServerMessage, Team,
};
