//! # Codenames
//!
//! Real-time backend for the Codenames word-guessing party game.
//!
//! Players create a room over HTTP, then join it over a WebSocket. Each
//! room is an isolated actor that owns its board, teams, score and turn;
//! each connection gets a session that pumps frames between the socket and
//! the room.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codenames::prelude::*;
//!
//! # async fn start() -> Result<(), CodenamesError> {
//! let server = CodenamesServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(WordList::builtin())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::CodenamesError;
pub use handler::ROOM_NOT_FOUND;
pub use server::{CodenamesServer, CodenamesServerBuilder};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{CodenamesError, CodenamesServer, CodenamesServerBuilder, ROOM_NOT_FOUND};
    pub use codenames_protocol::{
        ApiResponse, Card, GameState, Hint, Label, Message, MessageKind, Player,
        PlayerId, Role, RoomId, Score, ServerMessage, Team,
    };
    pub use codenames_room::{
        CollisionPolicy, HttpWordSource, Lobby, RoomConfig, RoomHandle, RoomInfo,
        WordList, WordSource, WordSourceError, DEFAULT_WORDS_URL,
    };
    pub use codenames_session::SessionConfig;
}
