//! Error types for the room layer.

use codenames_protocol::RoomId;

/// Errors from a [`WordSource`](crate::WordSource).
#[derive(Debug, thiserror::Error)]
pub enum WordSourceError {
    /// The source returned fewer words than a board needs.
    #[error("need {expected} words, got {got}")]
    InsufficientWords {
        /// Words a board needs.
        expected: usize,
        /// Words actually returned.
        got: usize,
    },

    /// The source returned the same word twice.
    #[error("duplicate word {0:?}")]
    DuplicateWord(String),

    /// The source could not be reached.
    #[error("word fetch failed: {0}")]
    Fetch(String),

    /// The source answered with something that isn't a word list.
    #[error("malformed word payload: {0}")]
    Malformed(String),
}

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with this id is already registered.
    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    /// A board could not be built from the given words.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A card index outside the board.
    #[error("card index {0} is out of range")]
    IndexOutOfRange(usize),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// Words for a new board could not be obtained.
    #[error(transparent)]
    Words(#[from] WordSourceError),
}
