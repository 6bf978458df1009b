//! Board Builder: deals hidden labels onto 25 words.

use std::collections::HashSet;

use codenames_protocol::{Card, Label, Team};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::RoomError;

/// Cards on a board.
pub const BOARD_SIZE: usize = 25;
/// Cards owned by the starting team.
pub const STARTING_TEAM_CARDS: usize = 9;
/// Cards owned by the other team.
pub const SECOND_TEAM_CARDS: usize = 8;
/// Assassin cards.
pub const ASSASSIN_CARDS: usize = 1;
/// Bystander cards.
pub const NEUTRAL_CARDS: usize = 7;

/// The two parallel boards of one room.
#[derive(Debug, Clone)]
pub struct Boards {
    /// Every label `Unknown`. Mutated as cards are revealed.
    pub public: Vec<Card>,
    /// True labels. Never changes after creation.
    pub answers: Vec<Card>,
}

/// Builds a fresh pair of boards.
///
/// Shuffles the positions `0..25` and hands out labels in order: the
/// first nine shuffled positions go to `starting_team`, the next eight to
/// its opponent, one to the assassin and the remaining seven are neutral.
/// Only the first 25 words are used.
///
/// Pass a long-lived RNG (`rand::rng()`, or a seeded `StdRng` in tests)
/// so boards dealt in the same run differ from one another.
///
/// # Errors
/// [`RoomError::InvalidInput`] if fewer than 25 words are given, or if
/// any of the first 25 repeat.
pub fn build_board<R: Rng + ?Sized>(
    words: &[String],
    starting_team: Team,
    rng: &mut R,
) -> Result<Boards, RoomError> {
    if words.len() < BOARD_SIZE {
        return Err(RoomError::InvalidInput(format!(
            "a board needs {BOARD_SIZE} words, got {}",
            words.len()
        )));
    }
    let words = &words[..BOARD_SIZE];

    let mut seen = HashSet::with_capacity(BOARD_SIZE);
    if let Some(dup) = words.iter().find(|w| !seen.insert(w.as_str())) {
        return Err(RoomError::InvalidInput(format!("duplicate word {dup:?}")));
    }

    let mut positions: Vec<usize> = (0..BOARD_SIZE).collect();
    positions.shuffle(rng);

    let mut labels = [Label::Neutral; BOARD_SIZE];
    for (rank, &pos) in positions.iter().enumerate() {
        labels[pos] = label_for_rank(rank, starting_team);
    }

    let public = words
        .iter()
        .map(|name| Card {
            name: name.clone(),
            label: Label::Unknown,
        })
        .collect();
    let answers = words
        .iter()
        .zip(labels)
        .map(|(name, label)| Card {
            name: name.clone(),
            label,
        })
        .collect();

    Ok(Boards { public, answers })
}

fn label_for_rank(rank: usize, starting_team: Team) -> Label {
    if rank < STARTING_TEAM_CARDS {
        starting_team.into()
    } else if rank < STARTING_TEAM_CARDS + SECOND_TEAM_CARDS {
        starting_team.opponent().into()
    } else if rank < STARTING_TEAM_CARDS + SECOND_TEAM_CARDS + ASSASSIN_CARDS {
        Label::Assassin
    } else {
        Label::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("word{i}")).collect()
    }

    fn count(cards: &[Card], label: Label) -> usize {
        cards.iter().filter(|c| c.label == label).count()
    }

    #[test]
    fn test_build_board_label_totals_for_any_seed() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let boards = build_board(&words(25), Team::Red, &mut rng).unwrap();
            assert_eq!(count(&boards.answers, Label::Red), 9);
            assert_eq!(count(&boards.answers, Label::Blue), 8);
            assert_eq!(count(&boards.answers, Label::Assassin), 1);
            assert_eq!(count(&boards.answers, Label::Neutral), 7);
        }
    }

    #[test]
    fn test_build_board_public_board_hides_labels() {
        let mut rng = StdRng::seed_from_u64(1);
        let boards = build_board(&words(25), Team::Red, &mut rng).unwrap();
        assert_eq!(boards.public.len(), BOARD_SIZE);
        assert_eq!(count(&boards.public, Label::Unknown), BOARD_SIZE);
    }

    #[test]
    fn test_build_board_keeps_word_order() {
        let mut rng = StdRng::seed_from_u64(2);
        let input = words(25);
        let boards = build_board(&input, Team::Red, &mut rng).unwrap();
        for (i, word) in input.iter().enumerate() {
            assert_eq!(&boards.public[i].name, word);
            assert_eq!(&boards.answers[i].name, word);
        }
    }

    #[test]
    fn test_build_board_blue_start_owns_nine() {
        let mut rng = StdRng::seed_from_u64(3);
        let boards = build_board(&words(25), Team::Blue, &mut rng).unwrap();
        assert_eq!(count(&boards.answers, Label::Blue), 9);
        assert_eq!(count(&boards.answers, Label::Red), 8);
    }

    #[test]
    fn test_build_board_same_rng_deals_different_boards() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = build_board(&words(25), Team::Red, &mut rng).unwrap();
        let b = build_board(&words(25), Team::Red, &mut rng).unwrap();
        assert_ne!(a.answers, b.answers);
    }

    #[test]
    fn test_build_board_too_few_words_is_invalid() {
        let mut rng = StdRng::seed_from_u64(5);
        let result = build_board(&words(24), Team::Red, &mut rng);
        assert!(matches!(result, Err(RoomError::InvalidInput(_))));
    }

    #[test]
    fn test_build_board_duplicate_word_is_invalid() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut input = words(25);
        input[10] = input[3].clone();
        let result = build_board(&input, Team::Red, &mut rng);
        assert!(matches!(result, Err(RoomError::InvalidInput(_))));
    }

    #[test]
    fn test_build_board_ignores_words_past_twenty_five() {
        let mut rng = StdRng::seed_from_u64(7);
        let boards = build_board(&words(30), Team::Red, &mut rng).unwrap();
        assert_eq!(boards.answers.len(), BOARD_SIZE);
    }
}
