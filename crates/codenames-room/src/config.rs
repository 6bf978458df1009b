//! Room configuration.

use codenames_protocol::Team;
use serde::{Deserialize, Serialize};

/// What [`Lobby::create_room`](crate::Lobby::create_room) does when the
/// requested room id is already registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the registered room. Players still connected to the old
    /// room keep playing there, but nobody new can reach it.
    #[default]
    Overwrite,
    /// Refuse with [`RoomError::AlreadyExists`](crate::RoomError::AlreadyExists).
    Reject,
}

/// Configuration shared by every room a [`Lobby`](crate::Lobby) creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// How many commands may wait in a room's queue before senders
    /// are made to wait.
    pub command_capacity: usize,

    /// The team that owns nine cards and moves first.
    pub starting_team: Team,

    /// Behavior on duplicate room ids.
    pub collision: CollisionPolicy,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            command_capacity: 256,
            starting_team: Team::Red,
            collision: CollisionPolicy::Overwrite,
        }
    }
}
