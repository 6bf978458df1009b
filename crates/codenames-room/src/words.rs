//! Word sources: where the 25 words of a new board come from.
//!
//! The room layer consumes words, it doesn't invent them. A
//! [`WordSource`] hands back a list; [`validate_words`] enforces the
//! contract (enough words, no repeats) for every implementation so no
//! source can quietly pad or repeat a board.

use std::collections::HashSet;
use std::future::Future;

#[cfg(feature = "http-words")]
use codenames_protocol::{Codec, JsonCodec};
use rand::seq::index;

use crate::board::BOARD_SIZE;
use crate::WordSourceError;

/// Supplies candidate words for new boards.
///
/// Implementations must return at least `count` distinct words per call.
/// Callers run the result through [`validate_words`].
pub trait WordSource: Send + Sync + 'static {
    /// Fetches `count` words.
    fn fetch_words(
        &self,
        count: usize,
    ) -> impl Future<Output = Result<Vec<String>, WordSourceError>> + Send;
}

/// Checks a fetched list against the board contract and trims it to
/// exactly `count` words.
///
/// # Errors
/// - [`WordSourceError::InsufficientWords`]: fewer than `count` words
/// - [`WordSourceError::DuplicateWord`]: a word repeats within the first
///   `count`
pub fn validate_words(
    mut words: Vec<String>,
    count: usize,
) -> Result<Vec<String>, WordSourceError> {
    if words.len() < count {
        return Err(WordSourceError::InsufficientWords {
            expected: count,
            got: words.len(),
        });
    }
    words.truncate(count);

    let mut seen = HashSet::with_capacity(count);
    for word in &words {
        if !seen.insert(word.as_str()) {
            return Err(WordSourceError::DuplicateWord(word.clone()));
        }
    }
    Ok(words)
}

/// Fetches and validates one board's worth of words.
pub async fn fetch_board_words(
    source: &impl WordSource,
) -> Result<Vec<String>, WordSourceError> {
    let words = source.fetch_words(BOARD_SIZE).await?;
    validate_words(words, BOARD_SIZE)
}

// ---------------------------------------------------------------------------
// WordList
// ---------------------------------------------------------------------------

const BUILTIN_WORDS: &[&str] = &[
    "africa", "agent", "air", "alien", "amazon", "angel", "antarctica",
    "apple", "arm", "back", "band", "bank", "bark", "beach", "belt", "berlin",
    "berry", "board", "bond", "boom", "bow", "box", "bug", "canada",
    "capital", "cell", "center", "china", "chocolate", "circle", "club",
    "compound", "copper", "crash", "cricket", "cross", "death", "dice",
    "dinosaur", "doctor", "dog", "dress", "dwarf", "eagle", "egypt", "engine",
    "england", "europe", "eye", "fair", "fall", "fan", "field", "file",
    "film", "fish", "flute", "fly", "forest", "fork", "france", "gas",
    "ghost", "giant", "glass", "glove", "gold", "grass", "greece", "green",
    "ham", "head", "himalaya", "hole", "hood", "hook", "horn", "horse",
    "hospital", "hotel", "ice", "iron", "ivory", "jack", "jam", "jet",
    "jupiter", "kangaroo", "ketchup", "kid", "king", "kiwi", "knife",
    "knight", "lab", "lap", "laser", "lawyer", "lead", "lemon", "limousine",
    "lock", "log", "mammoth", "maple", "march", "mass", "mercury", "millionaire",
    "model", "mole", "moscow", "mouth", "mug", "needle", "net", "night",
    "note", "novel", "nurse", "nut", "oil", "olive", "opera", "orange",
    "palm", "pan", "paper", "park", "pass", "pen", "piano", "pilot", "pirate",
    "pistol", "pit", "plate", "poison", "pole", "port", "press", "princess",
    "pyramid", "queen", "rabbit", "ray", "revolution", "ring", "robin",
    "robot", "rock", "rome", "root", "rose", "round", "row", "ruler",
    "satellite", "saturn", "school", "scientist", "scorpion", "screen",
    "seal", "server", "shadow", "shark", "ship", "shoe", "shop", "sink",
    "skyscraper", "slip", "smuggler", "snow", "soldier", "soul", "space",
    "spell", "spider", "spike", "spring", "spy", "square", "stadium", "star",
    "state", "stick", "stock", "straw", "stream", "strike", "sub", "suit",
    "superhero", "swing", "switch", "table", "tablet", "tag", "tail", "tap",
    "teacher", "telescope", "temple", "thief", "thumb", "tick", "tie",
    "time", "tokyo", "tooth", "torch", "tower", "track", "train", "triangle",
    "trip", "trunk", "tube", "turkey", "undertaker", "unicorn", "vacuum",
    "van", "vet", "wake", "wall", "war", "washer", "washington", "watch",
    "water", "wave", "web", "well", "whale", "whip", "wind", "witch", "worm",
    "yard",
];

/// An in-process pool of words, sampled without replacement.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Creates a source from a caller-supplied pool.
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// The built-in pool of nouns.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_WORDS.iter().map(|w| (*w).to_string()).collect())
    }

    /// Number of words in the pool.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn sample(&self, count: usize) -> Vec<String> {
        let amount = count.min(self.words.len());
        let mut rng = rand::rng();
        index::sample(&mut rng, self.words.len(), amount)
            .into_iter()
            .map(|i| self.words[i].clone())
            .collect()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordSource for WordList {
    async fn fetch_words(
        &self,
        count: usize,
    ) -> Result<Vec<String>, WordSourceError> {
        Ok(self.sample(count))
    }
}

// ---------------------------------------------------------------------------
// HttpWordSource
// ---------------------------------------------------------------------------

/// The public random-noun service boards were originally dealt from.
#[cfg(feature = "http-words")]
pub const DEFAULT_WORDS_URL: &str =
    "https://random-word-form.herokuapp.com/random/noun?count=25";

/// A remote service that answers a GET with a JSON array of words.
#[cfg(feature = "http-words")]
#[derive(Debug, Clone)]
pub struct HttpWordSource {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http-words")]
impl HttpWordSource {
    /// Creates a source for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// The URL this source fetches from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http-words")]
impl WordSource for HttpWordSource {
    async fn fetch_words(
        &self,
        _count: usize,
    ) -> Result<Vec<String>, WordSourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| WordSourceError::Fetch(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| WordSourceError::Fetch(e.to_string()))?;

        parse_word_payload(&body)
    }
}

/// Parses a JSON array of strings.
#[cfg(feature = "http-words")]
fn parse_word_payload(body: &str) -> Result<Vec<String>, WordSourceError> {
    JsonCodec
        .decode(body)
        .map_err(|e| WordSourceError::Malformed(e.to_string()))
}
