//! Lobby: the registry of live rooms.

use std::collections::HashMap;

use codenames_protocol::{Player, RoomId};

use crate::board::build_board;
use crate::room::spawn_room;
use crate::{CollisionPolicy, RoomConfig, RoomError, RoomHandle};

/// Creates rooms and finds them again by id.
///
/// This is the entry point for room operations from the HTTP layer. The
/// lobby only stores handles; each room's state lives in its own actor.
pub struct Lobby {
    /// Active rooms, keyed by room ID.
    rooms: HashMap<RoomId, RoomHandle>,
    config: RoomConfig,
}

impl Lobby {
    /// Creates a new, empty lobby.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// The configuration new rooms are created with.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Deals a board from `words` and starts a room.
    ///
    /// With [`CollisionPolicy::Overwrite`] an existing room with the same
    /// id is replaced in the registry. Its actor keeps running for the
    /// connections already inside it.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyExists`]: id taken under
    ///   [`CollisionPolicy::Reject`]
    /// - [`RoomError::InvalidInput`]: `words` can't fill a board
    pub fn create_room(
        &mut self,
        room_id: RoomId,
        owner: Player,
        words: &[String],
    ) -> Result<RoomHandle, RoomError> {
        let taken = self.rooms.contains_key(&room_id);
        if taken && self.config.collision == CollisionPolicy::Reject {
            return Err(RoomError::AlreadyExists(room_id));
        }

        let boards = build_board(words, self.config.starting_team, &mut rand::rng())?;
        let handle = spawn_room(room_id.clone(), owner, boards, &self.config);

        if taken {
            tracing::warn!(%room_id, "room id reused, replacing registered room");
        }
        self.rooms.insert(room_id.clone(), handle.clone());
        tracing::info!(%room_id, rooms = self.rooms.len(), "room created");
        Ok(handle)
    }

    /// Looks up a room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no room has that id.
    pub fn find_room(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Returns the number of registered rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all registered room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
