//! Rooms for the Codenames server.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! game outright: boards, teams, log, score, turn and hint.
//!
//! # Key types
//!
//! - [`Lobby`]: creates rooms and finds them by id
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`Game`]: the turn, scoring, and role rules the actor applies
//! - [`WordSource`]: where board words come from
//! - [`RoomConfig`]: settings shared by every room
//!
//! # Feature Flags
//!
//! - `http-words` (default): [`HttpWordSource`], which fetches words
//!   from a remote JSON service

mod board;
mod config;
mod error;
mod game;
mod lobby;
mod room;
mod words;

pub use board::{
    build_board, Boards, ASSASSIN_CARDS, BOARD_SIZE, NEUTRAL_CARDS,
    SECOND_TEAM_CARDS, STARTING_TEAM_CARDS,
};
pub use config::{CollisionPolicy, RoomConfig};
pub use error::{RoomError, WordSourceError};
pub use game::Game;
pub use lobby::Lobby;
pub use room::{Outbound, RoomHandle, RoomInfo};
pub use words::{fetch_board_words, validate_words, WordList, WordSource};
#[cfg(feature = "http-words")]
pub use words::{HttpWordSource, DEFAULT_WORDS_URL};
