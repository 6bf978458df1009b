//! Client → server frames and the actions they map to.
//!
//! Clients send `{ "msgType": "...", "data": { ... } }`. The `msgType`
//! string picks the action; `data` carries whichever of `idx`, `word`,
//! `count`, `text` that action needs. Anything with an unrecognized
//! `msgType` is treated as chat.

use serde::{Deserialize, Serialize};

use crate::{Codec, ProtocolError, Role};

/// The raw text a client sends to say it is leaving on purpose.
pub const CLOSE_REQUEST: &str = "con-closed";

/// The decoded shape of a client frame, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientFrame {
    /// Selects the action. A frame without one is chat.
    #[serde(rename = "msgType", default)]
    pub msg_type: String,
    /// Action arguments. Missing `data` decodes as all-empty.
    #[serde(default)]
    pub data: ClientData,
}

/// Optional arguments carried by a [`ClientFrame`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    /// Card index for `card-click`. Browsers send it as a JSON number,
    /// which may arrive as a float.
    #[serde(default)]
    pub idx: Option<f64>,
    /// Clue word for `hint`.
    #[serde(default)]
    pub word: Option<String>,
    /// Guess budget for `hint`.
    #[serde(default)]
    pub count: Option<u32>,
    /// Chat text.
    #[serde(default)]
    pub text: Option<String>,
}

/// What a client asked the room to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Move to a team or spymaster seat.
    SetRole(Role),
    /// Give a clue.
    GiveHint {
        /// The clue word.
        word: String,
        /// How many guesses it allows.
        count: u32,
    },
    /// Reveal one card.
    RevealCard {
        /// Board position, not yet range-checked.
        index: usize,
    },
    /// Say something.
    Chat {
        /// The chat line.
        text: String,
    },
    /// The client is leaving.
    Close,
}

impl ClientAction {
    /// Interprets one text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] for text that isn't a client
    /// frame, and [`ProtocolError::InvalidMessage`] when a known
    /// `msgType` is missing the fields it needs.
    pub fn parse(codec: &impl Codec, text: &str) -> Result<Self, ProtocolError> {
        if text == CLOSE_REQUEST {
            return Ok(Self::Close);
        }

        let frame: ClientFrame = codec.decode(text)?;
        let ClientFrame { msg_type, data } = frame;

        let action = match msg_type.as_str() {
            "join-red" => Self::SetRole(Role::Red),
            "join-blue" => Self::SetRole(Role::Blue),
            "join-red-spy" => Self::SetRole(Role::RedSpy),
            "join-blue-spy" => Self::SetRole(Role::BlueSpy),
            "hint" => match (data.word, data.count) {
                (Some(word), Some(count)) => Self::GiveHint { word, count },
                _ => {
                    return Err(ProtocolError::InvalidMessage(
                        "hint needs word and count".into(),
                    ));
                }
            },
            "card-click" => {
                let idx = data.idx.ok_or_else(|| {
                    ProtocolError::InvalidMessage("card-click needs idx".into())
                })?;
                if !idx.is_finite() || idx < 0.0 {
                    return Err(ProtocolError::InvalidMessage(format!(
                        "card index {idx} is not a board position"
                    )));
                }
                Self::RevealCard {
                    index: idx as usize,
                }
            }
            _ => Self::Chat {
                text: data.text.unwrap_or_else(|| text.to_string()),
            },
        };

        Ok(action)
    }
}
