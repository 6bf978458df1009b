//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. The actor is the only code that ever touches
//! the room's [`Game`], so commands are applied strictly one at a time in
//! the order they were queued. Commands from one connection keep their
//! order because a connection's inbound loop awaits each send before
//! reading the next frame.
//!
//! Delivery in the other direction never waits. Every connection hands
//! the room a bounded [`Outbound`] queue on join; the room pushes with
//! `try_send`, and a connection whose queue is full (or gone) is dropped
//! from the roster on the spot. Dropping its sender is what closes the
//! queue and tells that connection's outbound loop to hang up.

use std::collections::HashMap;
use std::sync::Arc;

use codenames_protocol::{Card, GameState, Message, Player, Role, RoomId, ServerMessage};
use codenames_transport::ConnectionId;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::board::Boards;
use crate::{Game, RoomConfig, RoomError};

/// One frame queued for a connection. Shared, because the same broadcast
/// goes to many connections.
pub type Outbound = Arc<ServerMessage>;

/// Commands sent to a room actor through its channel.
///
/// Everything except `Join` names the connection rather than the player:
/// the actor looks the player up in its roster, so a connection that was
/// never registered (or was already shed) can't act in the room.
pub(crate) enum RoomCommand {
    /// Register a connection and send it a snapshot.
    Join {
        player: Player,
        conn_id: ConnectionId,
        outbox: mpsc::Sender<Outbound>,
    },

    /// Unregister a connection.
    Leave { conn_id: ConnectionId },

    /// Move the connection's player to a role.
    SetRole { conn_id: ConnectionId, role: Role },

    /// Set the active clue.
    GiveHint {
        conn_id: ConnectionId,
        word: String,
        count: u32,
    },

    /// Reveal a card.
    RevealCard { conn_id: ConnectionId, index: usize },

    /// Relay a chat line.
    Chat { conn_id: ConnectionId, text: String },

    /// Read the room without changing it.
    Inspect { reply: oneshot::Sender<RoomInfo> },
}

/// A point-in-time copy of a room, for diagnostics and tests.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's id.
    pub room_id: RoomId,
    /// The public state, exactly as guessers see it.
    pub state: GameState,
    /// The answer board.
    pub answers: Vec<Card>,
    /// Connections currently registered.
    pub connections: usize,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// This is cheap to clone: it is just an `mpsc::Sender` wrapper. The
/// [`Lobby`](crate::Lobby) holds one per room and each connection session
/// holds another. The actor stops once every handle is dropped and its
/// queue is drained.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's id.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Registers a connection. The room answers on `outbox` with a state
    /// snapshot, then keeps it fed with every broadcast.
    pub async fn join(
        &self,
        player: Player,
        conn_id: ConnectionId,
        outbox: mpsc::Sender<Outbound>,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Join {
            player,
            conn_id,
            outbox,
        })
        .await
    }

    /// Unregisters a connection. Unknown connections are ignored.
    pub async fn leave(&self, conn_id: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave { conn_id }).await
    }

    /// Moves the connection's player to `role`.
    pub async fn set_role(
        &self,
        conn_id: ConnectionId,
        role: Role,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::SetRole { conn_id, role }).await
    }

    /// Sets the active clue.
    pub async fn give_hint(
        &self,
        conn_id: ConnectionId,
        word: String,
        count: u32,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::GiveHint {
            conn_id,
            word,
            count,
        })
        .await
    }

    /// Reveals the card at `index`. Indices past the board are dropped
    /// by the room.
    pub async fn reveal_card(
        &self,
        conn_id: ConnectionId,
        index: usize,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::RevealCard { conn_id, index }).await
    }

    /// Relays a chat line to everyone in the room.
    pub async fn chat(
        &self,
        conn_id: ConnectionId,
        text: String,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Chat { conn_id, text }).await
    }

    /// Takes a snapshot of the room.
    ///
    /// The reply comes back after every command queued before it, so it
    /// reflects all of them.
    pub async fn inspect(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Inspect { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// A registered connection.
struct Member {
    player: Player,
    outbox: mpsc::Sender<Outbound>,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    game: Game,
    members: HashMap<ConnectionId, Member>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until every handle is gone.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player,
                    conn_id,
                    outbox,
                } => self.handle_join(player, conn_id, outbox),
                RoomCommand::Leave { conn_id } => self.handle_leave(conn_id),
                RoomCommand::SetRole { conn_id, role } => {
                    let Some(player) = self.player(conn_id) else {
                        continue;
                    };
                    if let Some(msg) = self.game.set_role(&player, role) {
                        tracing::debug!(
                            room_id = %self.room_id,
                            %conn_id,
                            text = %msg.text,
                            "role changed"
                        );
                        self.broadcast_state();
                    }
                }
                RoomCommand::GiveHint {
                    conn_id,
                    word,
                    count,
                } => {
                    let Some(player) = self.player(conn_id) else {
                        continue;
                    };
                    self.game.give_hint(&player, word, count);
                    self.broadcast_state();
                }
                RoomCommand::RevealCard { conn_id, index } => {
                    let Some(player) = self.player(conn_id) else {
                        continue;
                    };
                    match self.game.reveal(&player, index) {
                        Ok(_) => self.broadcast_state(),
                        Err(e) => {
                            tracing::debug!(
                                room_id = %self.room_id,
                                %conn_id,
                                error = %e,
                                "reveal rejected"
                            );
                        }
                    }
                }
                RoomCommand::Chat { conn_id, text } => {
                    let Some(player) = self.player(conn_id) else {
                        continue;
                    };
                    let msg = self.game.chat(&player, text);
                    self.broadcast_message(msg);
                }
                RoomCommand::Inspect { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player: Player,
        conn_id: ConnectionId,
        outbox: mpsc::Sender<Outbound>,
    ) {
        let snapshot = Arc::new(ServerMessage::State(Box::new(
            self.game.view_for(&player.id),
        )));
        let greeting = self
            .game
            .chat(&player, format!("{} joined the room", player.nickname));
        let player_id = player.id.clone();

        self.members.insert(conn_id, Member { player, outbox });
        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            %conn_id,
            connections = self.members.len(),
            "player joined"
        );

        self.deliver(conn_id, snapshot);
        self.broadcast_message(greeting);
    }

    fn handle_leave(&mut self, conn_id: ConnectionId) {
        let Some(member) = self.members.remove(&conn_id) else {
            tracing::debug!(room_id = %self.room_id, %conn_id, "leave for unknown connection");
            return;
        };
        tracing::info!(
            room_id = %self.room_id,
            player_id = %member.player.id,
            %conn_id,
            connections = self.members.len(),
            "player left"
        );
        self.game.leave(&member.player);
        self.broadcast_state();
    }

    fn player(&self, conn_id: ConnectionId) -> Option<Player> {
        let player = self.members.get(&conn_id).map(|m| m.player.clone());
        if player.is_none() {
            tracing::warn!(
                room_id = %self.room_id,
                %conn_id,
                "command from unregistered connection, ignoring"
            );
        }
        player
    }

    // -----------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------

    /// Sends each member the state as its role may see it.
    fn broadcast_state(&mut self) {
        let public = Arc::new(ServerMessage::State(Box::new(
            self.game.state().clone(),
        )));
        let secret = Arc::new(ServerMessage::State(Box::new(
            self.game.spymaster_view(),
        )));

        let mut shed = Vec::new();
        for (conn_id, member) in &self.members {
            let frame = if self.game.is_spymaster(&member.player.id) {
                &secret
            } else {
                &public
            };
            if let Err(e) = member.outbox.try_send(Arc::clone(frame)) {
                shed.push((*conn_id, e));
            }
        }
        self.shed(shed);
    }

    /// Sends the same message to every member, spymasters included.
    fn broadcast_message(&mut self, msg: Message) {
        let frame = Arc::new(ServerMessage::Chat(msg));

        let mut shed = Vec::new();
        for (conn_id, member) in &self.members {
            if let Err(e) = member.outbox.try_send(Arc::clone(&frame)) {
                shed.push((*conn_id, e));
            }
        }
        self.shed(shed);
    }

    /// Sends one frame to one member.
    fn deliver(&mut self, conn_id: ConnectionId, frame: Outbound) {
        let result = match self.members.get(&conn_id) {
            Some(member) => member.outbox.try_send(frame),
            None => return,
        };
        if let Err(e) = result {
            self.shed(vec![(conn_id, e)]);
        }
    }

    /// Drops members whose queue refused a frame. Removing the roster
    /// entry drops the room's sender, which closes the queue.
    fn shed(&mut self, failed: Vec<(ConnectionId, TrySendError<Outbound>)>) {
        for (conn_id, err) in failed {
            let Some(member) = self.members.remove(&conn_id) else {
                continue;
            };
            let reason = match err {
                TrySendError::Full(_) => "outbound queue full",
                TrySendError::Closed(_) => "outbound queue closed",
            };
            tracing::warn!(
                room_id = %self.room_id,
                player_id = %member.player.id,
                %conn_id,
                reason,
                "connection shed"
            );
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            state: self.game.state().clone(),
            answers: self.game.answers().to_vec(),
            connections: self.members.len(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `config.command_capacity` bounds the command queue: when it fills up,
/// senders wait.
pub(crate) fn spawn_room(
    room_id: RoomId,
    owner: Player,
    boards: Boards,
    config: &RoomConfig,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.command_capacity.max(1));

    let actor = RoomActor {
        room_id: room_id.clone(),
        game: Game::new(room_id.clone(), owner, boards, config.starting_team),
        members: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
