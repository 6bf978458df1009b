//! Core protocol types for the Codenames wire format.
//!
//! Every type in this module is something that gets serialized and sent
//! to a browser client, or parsed out of a frame the client sent us.
//! The JSON shapes here are the contract with the front end, so the serde
//! attributes matter as much as the fields themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier, chosen by the client when it creates or joins.
///
/// This is a "newtype wrapper" around `String`. Two `Player` values with
/// the same `PlayerId` are the same player, even if their nicknames
/// differ. `#[serde(transparent)]` keeps it a plain JSON string on the
/// wire instead of `{ "0": "p1" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A room's identifier, chosen by the player that creates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A participant in a room.
///
/// `nickname` is display-only. Copies of the same player stored in
/// different places (a team list, a spymaster seat, the room owner) may
/// carry different nicknames; nothing keeps them in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity.
    pub id: PlayerId,
    /// Name shown to other players.
    pub nickname: String,
}

impl Player {
    /// Creates a player from anything string-like.
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id.into()),
            nickname: nickname.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Teams, roles, labels
// ---------------------------------------------------------------------------

/// One of the two competing sides.
///
/// Red is "team A": it owns nine cards and moves first. Blue is "team B"
/// with eight cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Team A.
    Red,
    /// Team B.
    Blue,
}

impl Team {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("RED"),
            Self::Blue => f.write_str("BLUE"),
        }
    }
}

/// A role a player can request. A player with none of these is
/// unassigned (spectating).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Guesser on the red team.
    Red,
    /// Guesser on the blue team.
    Blue,
    /// Red spymaster.
    RedSpy,
    /// Blue spymaster.
    BlueSpy,
}

impl Role {
    /// The team this role plays for.
    pub fn team(self) -> Team {
        match self {
            Self::Red | Self::RedSpy => Team::Red,
            Self::Blue | Self::BlueSpy => Team::Blue,
        }
    }

    /// Returns `true` for the two spymaster seats.
    pub fn is_spymaster(self) -> bool {
        matches!(self, Self::RedSpy | Self::BlueSpy)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red | Self::Blue => write!(f, "{} team", self.team()),
            Self::RedSpy | Self::BlueSpy => write!(f, "{} SPY", self.team()),
        }
    }
}

/// The hidden (or revealed) identity of a card.
///
/// The public board starts with every card `Unknown`; the answer board
/// never contains `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Not yet revealed.
    Unknown,
    /// Belongs to the red team.
    Red,
    /// Belongs to the blue team.
    Blue,
    /// The assassin card.
    Assassin,
    /// A bystander.
    Neutral,
}

impl Label {
    /// The team that owns this card, if any.
    pub fn team(self) -> Option<Team> {
        match self {
            Self::Red => Some(Team::Red),
            Self::Blue => Some(Team::Blue),
            _ => None,
        }
    }
}

impl From<Team> for Label {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => Self::Red,
            Team::Blue => Self::Blue,
        }
    }
}

// ---------------------------------------------------------------------------
// Board and game state
// ---------------------------------------------------------------------------

/// One word on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// The word printed on the card.
    pub name: String,
    /// What the viewer knows about the card.
    pub label: Label,
}

/// The active clue.
///
/// `remaining_guesses == 0` means there is no active hint. On the wire the
/// budget is called `count`, matching the field clients send with a hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// The clue word.
    pub word: String,
    /// Guesses the team may still make under this clue.
    #[serde(rename = "count")]
    pub remaining_guesses: u32,
}

impl Hint {
    /// Returns `true` while guesses remain under the clue.
    pub fn is_active(&self) -> bool {
        self.remaining_guesses > 0
    }

    /// Drops the clue entirely.
    pub fn clear(&mut self) {
        self.word.clear();
        self.remaining_guesses = 0;
    }
}

/// Points per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Red team's points.
    pub red: u32,
    /// Blue team's points.
    pub blue: u32,
}

impl Score {
    /// Returns one team's points.
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    /// Adds one point to a team.
    pub fn increment(&mut self, team: Team) {
        match team {
            Team::Red => self.red += 1,
            Team::Blue => self.blue += 1,
        }
    }
}

/// How a [`Message`] should be treated by the room.
///
/// `Info` and `Spy` messages are game events: they are appended to the
/// room log and trigger a full state broadcast. `Chat` messages are
/// relayed as-is and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// A game event (team change, hint, reveal, leave).
    Info,
    /// A spymaster seat change.
    Spy,
    /// Free-form player chat.
    Chat,
}

/// A log line or chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who caused the message.
    #[serde(rename = "playerid")]
    pub sender_id: PlayerId,
    /// Human-readable text.
    pub text: String,
    /// Whether it is stored and how it is broadcast.
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl Message {
    /// Builds a message from its parts.
    pub fn new(
        sender_id: PlayerId,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> Self {
        Self {
            sender_id,
            text: text.into(),
            kind,
        }
    }

    /// Returns `true` if the message belongs in the room log.
    pub fn is_logged(&self) -> bool {
        matches!(self.kind, MessageKind::Info | MessageKind::Spy)
    }
}

/// A full snapshot of one room.
///
/// The room actor owns the authoritative copy. What goes out on the wire
/// is a *view*: guessers get the public board in `cards`, spymasters get
/// the answer board in the same field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// The room this state belongs to.
    pub room_id: RoomId,
    /// The player that created the room.
    pub owner: Player,
    /// The 25 cards, in board order.
    pub cards: Vec<Card>,
    /// The red spymaster seat.
    pub red_spy: Option<Player>,
    /// The blue spymaster seat.
    pub blue_spy: Option<Player>,
    /// Red guessers, in join order.
    pub team_red: Vec<Player>,
    /// Blue guessers, in join order.
    pub team_blue: Vec<Player>,
    /// Stored game events.
    pub log: Vec<Message>,
    /// Points per team.
    pub score: Score,
    /// Whose turn it is.
    pub turn: Team,
    /// The active clue.
    pub hint: Hint,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Everything the server can push to a client.
///
/// `#[serde(untagged)]` means there is no wrapper: a state update is the
/// bare `GameState` object and a chat line is the bare `Message` object.
/// The client tells them apart by shape (`roomId` vs `playerid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// A role-filtered state snapshot.
    State(Box<GameState>),
    /// A transient chat line.
    Chat(Message),
}

/// The JSON body of every HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Whether the request succeeded.
    pub ok: bool,
}

impl ApiResponse {
    /// A successful response.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ok: true,
        }
    }

    /// A failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ok: false,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
