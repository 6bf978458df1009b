//! Turn, scoring, and role rules for one room.
//!
//! [`Game`] is plain data plus methods: no channels, no tasks. The room
//! actor owns exactly one and is the only caller, which is what makes every
//! mutation here linearizable without locks.

use codenames_protocol::{
    Card, GameState, Hint, Message, MessageKind, Player, PlayerId, Role,
    RoomId, Score, Team,
};

use crate::board::Boards;
use crate::RoomError;

/// A room's authoritative state: the public `GameState` plus the answer
/// board that only spymasters may see.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    answers: Vec<Card>,
}

impl Game {
    /// Starts a game on freshly dealt boards. `starting_team` moves first.
    pub fn new(
        room_id: RoomId,
        owner: Player,
        boards: Boards,
        starting_team: Team,
    ) -> Self {
        let Boards { public, answers } = boards;
        Self {
            state: GameState {
                room_id,
                owner,
                cards: public,
                red_spy: None,
                blue_spy: None,
                team_red: Vec::new(),
                team_blue: Vec::new(),
                log: Vec::new(),
                score: Score::default(),
                turn: starting_team,
                hint: Hint::default(),
            },
            answers,
        }
    }

    /// The public state (labels hidden until revealed).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The answer board.
    pub fn answers(&self) -> &[Card] {
        &self.answers
    }

    /// Returns `true` if the player holds either spymaster seat.
    pub fn is_spymaster(&self, player: &PlayerId) -> bool {
        seat_holds(&self.state.red_spy, player) || seat_holds(&self.state.blue_spy, player)
    }

    /// The role a player currently holds, if any.
    pub fn role_of(&self, player: &PlayerId) -> Option<Role> {
        if seat_holds(&self.state.red_spy, player) {
            Some(Role::RedSpy)
        } else if seat_holds(&self.state.blue_spy, player) {
            Some(Role::BlueSpy)
        } else if team_holds(&self.state.team_red, player) {
            Some(Role::Red)
        } else if team_holds(&self.state.team_blue, player) {
            Some(Role::Blue)
        } else {
            None
        }
    }

    /// The state as `viewer` may see it.
    ///
    /// Spymasters get the answer board in `cards`; everyone else gets the
    /// public board.
    pub fn view_for(&self, viewer: &PlayerId) -> GameState {
        if self.is_spymaster(viewer) {
            self.spymaster_view()
        } else {
            self.state.clone()
        }
    }

    /// The state with the answer board in `cards`.
    pub fn spymaster_view(&self) -> GameState {
        GameState {
            cards: self.answers.clone(),
            ..self.state.clone()
        }
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Moves `player` into `role`.
    ///
    /// The player is removed from whichever role they held before, so a
    /// player id is only ever in one of the four collections. A player
    /// already in `role` is left alone and `None` is returned. Taking an
    /// occupied spymaster seat unseats its holder.
    pub fn set_role(&mut self, player: &Player, role: Role) -> Option<Message> {
        let previous = self.role_of(&player.id);
        if previous == Some(role) {
            return None;
        }
        if let Some(old) = previous {
            self.remove_from(old, &player.id);
        }

        match role {
            Role::Red => self.state.team_red.push(player.clone()),
            Role::Blue => self.state.team_blue.push(player.clone()),
            Role::RedSpy => self.state.red_spy = Some(player.clone()),
            Role::BlueSpy => self.state.blue_spy = Some(player.clone()),
        }

        let text = match previous {
            Some(old) => format!("{} joined {role} and removed from {old}", player.nickname),
            None => format!("{} joined {role}", player.nickname),
        };
        let kind = if role.is_spymaster() {
            MessageKind::Spy
        } else {
            MessageKind::Info
        };
        Some(self.record(Message::new(player.id.clone(), text, kind)))
    }

    /// Sets the active clue, replacing any unfinished one.
    pub fn give_hint(&mut self, player: &Player, word: String, count: u32) -> Message {
        let text = format!("{} gave hint {word} {count}", player.nickname);
        self.state.hint = Hint {
            word,
            remaining_guesses: count,
        };
        self.record(Message::new(player.id.clone(), text, MessageKind::Info))
    }

    /// Reveals the card at `index` and applies the scoring and turn rules.
    ///
    /// - A team-colored card revealed while guesses remain scores a point
    ///   for the team that owns it. If that is the team on turn, one guess
    ///   is used up; otherwise the turn's guesses drop to zero.
    /// - Anything else (neutral, assassin, or any card without guesses
    ///   left) clears the hint.
    /// - Whenever no guesses remain afterwards, the turn passes and the
    ///   clue word is cleared.
    ///
    /// Already-revealed cards are not special: revealing one again runs
    /// the same rules again. The assassin ends the turn like a neutral
    /// card.
    ///
    /// # Errors
    /// [`RoomError::IndexOutOfRange`] for an index past the board.
    pub fn reveal(&mut self, player: &Player, index: usize) -> Result<Message, RoomError> {
        let answer = self
            .answers
            .get(index)
            .ok_or(RoomError::IndexOutOfRange(index))?;
        let revealed = answer.label;
        let name = answer.name.clone();

        if let Some(card) = self.state.cards.get_mut(index) {
            card.label = revealed;
        }

        let hint = &mut self.state.hint;
        match revealed.team() {
            Some(owner) if hint.is_active() => {
                self.state.score.increment(owner);
                if owner == self.state.turn {
                    hint.remaining_guesses -= 1;
                } else {
                    hint.remaining_guesses = 0;
                }
            }
            _ => hint.clear(),
        }

        if !self.state.hint.is_active() {
            self.state.turn = self.state.turn.opponent();
            self.state.hint.word.clear();
        }

        let text = format!("{} clicked on {name}", player.nickname);
        Ok(self.record(Message::new(player.id.clone(), text, MessageKind::Info)))
    }

    /// Logs that a player left. Team membership is kept.
    pub fn leave(&mut self, player: &Player) -> Message {
        let text = format!("{} left the room", player.nickname);
        self.record(Message::new(player.id.clone(), text, MessageKind::Info))
    }

    /// Builds a chat line. Chat is never stored.
    pub fn chat(&self, player: &Player, text: String) -> Message {
        Message::new(player.id.clone(), text, MessageKind::Chat)
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    fn record(&mut self, msg: Message) -> Message {
        if msg.is_logged() {
            self.state.log.push(msg.clone());
        }
        msg
    }

    fn remove_from(&mut self, role: Role, player: &PlayerId) {
        match role {
            Role::Red => self.state.team_red.retain(|p| &p.id != player),
            Role::Blue => self.state.team_blue.retain(|p| &p.id != player),
            Role::RedSpy => self.state.red_spy = None,
            Role::BlueSpy => self.state.blue_spy = None,
        }
    }
}

fn seat_holds(seat: &Option<Player>, player: &PlayerId) -> bool {
    seat.as_ref().is_some_and(|p| &p.id == player)
}

fn team_holds(team: &[Player], player: &PlayerId) -> bool {
    team.iter().any(|p| &p.id == player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::build_board;
    use codenames_protocol::Label;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> Game {
        let words: Vec<String> = (0..25).map(|i| format!("w{i}")).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let boards = build_board(&words, Team::Red, &mut rng).unwrap();
        Game::new(
            RoomId::from("abc123"),
            Player::new("p1", "Alice"),
            boards,
            Team::Red,
        )
    }

    fn alice() -> Player {
        Player::new("p1", "Alice")
    }

    fn bob() -> Player {
        Player::new("p2", "Bob")
    }

    fn index_of(game: &Game, label: Label) -> usize {
        game.answers()
            .iter()
            .position(|c| c.label == label)
            .unwrap()
    }

    fn memberships(game: &Game, id: &PlayerId) -> usize {
        let s = game.state();
        usize::from(seat_holds(&s.red_spy, id))
            + usize::from(seat_holds(&s.blue_spy, id))
            + s.team_red.iter().filter(|p| &p.id == id).count()
            + s.team_blue.iter().filter(|p| &p.id == id).count()
    }

    fn with_hint(count: u32) -> Game {
        let mut g = game();
        g.give_hint(&bob(), "x".into(), count);
        g
    }

    // =====================================================================
    // set_role()
    // =====================================================================

    #[test]
    fn test_set_role_first_join_has_plain_message() {
        let mut g = game();
        let msg = g.set_role(&alice(), Role::Red).unwrap();
        assert_eq!(msg.text, "Alice joined RED team");
        assert_eq!(msg.kind, MessageKind::Info);
        assert_eq!(g.role_of(&alice().id), Some(Role::Red));
    }

    #[test]
    fn test_set_role_red_then_blue_moves_player() {
        let mut g = game();
        g.set_role(&alice(), Role::Red);
        g.set_role(&alice(), Role::Blue);

        let s = g.state();
        assert!(s.team_red.is_empty());
        assert_eq!(s.team_blue, vec![alice()]);
        let infos = s.log.iter().filter(|m| m.kind == MessageKind::Info).count();
        assert_eq!(infos, 2);
        assert_eq!(s.log[1].text, "Alice joined BLUE team and removed from RED team");
    }

    #[test]
    fn test_set_role_spy_to_team_single_change() {
        let mut g = game();
        g.set_role(&alice(), Role::RedSpy);
        let before = g.state().log.len();

        let msg = g.set_role(&alice(), Role::Blue).unwrap();

        assert_eq!(g.state().red_spy, None);
        assert_eq!(g.state().team_blue, vec![alice()]);
        assert_eq!(g.state().log.len(), before + 1);
        assert!(msg.text.contains("joined BLUE team"));
        assert!(msg.text.contains("removed from RED SPY"));
    }

    #[test]
    fn test_set_role_same_role_is_noop() {
        let mut g = game();
        g.set_role(&alice(), Role::Blue);
        assert!(g.set_role(&alice(), Role::Blue).is_none());
        assert_eq!(g.state().team_blue.len(), 1);
        assert_eq!(g.state().log.len(), 1);
    }

    #[test]
    fn test_set_role_spy_seat_logged_as_spy() {
        let mut g = game();
        let msg = g.set_role(&alice(), Role::BlueSpy).unwrap();
        assert_eq!(msg.kind, MessageKind::Spy);
        assert_eq!(msg.text, "Alice joined BLUE SPY");
        assert_eq!(g.state().log.len(), 1);
    }

    #[test]
    fn test_set_role_taking_occupied_seat_unseats_holder() {
        let mut g = game();
        g.set_role(&alice(), Role::RedSpy);
        g.set_role(&bob(), Role::RedSpy);
        assert_eq!(g.state().red_spy, Some(bob()));
        assert_eq!(g.role_of(&alice().id), None);
    }

    #[test]
    fn test_set_role_membership_never_exceeds_one() {
        let mut g = game();
        let roles = [
            Role::Red,
            Role::RedSpy,
            Role::Blue,
            Role::BlueSpy,
            Role::Red,
            Role::Blue,
            Role::RedSpy,
            Role::RedSpy,
            Role::BlueSpy,
            Role::Red,
        ];
        for role in roles {
            g.set_role(&alice(), role);
            assert_eq!(memberships(&g, &alice().id), 1);
            assert_eq!(g.role_of(&alice().id), Some(role));
        }
    }

    // =====================================================================
    // views
    // =====================================================================

    #[test]
    fn test_view_for_guesser_hides_labels() {
        let mut g = game();
        g.set_role(&alice(), Role::Red);
        let view = g.view_for(&alice().id);
        assert!(view.cards.iter().all(|c| c.label == Label::Unknown));
    }

    #[test]
    fn test_view_for_spymaster_shows_answers() {
        let mut g = game();
        g.set_role(&alice(), Role::BlueSpy);
        let view = g.view_for(&alice().id);
        assert_eq!(view.cards, g.answers());
        assert_eq!(view.log, g.state().log);
    }

    // =====================================================================
    // give_hint()
    // =====================================================================

    #[test]
    fn test_give_hint_sets_hint_and_logs() {
        let mut g = game();
        let msg = g.give_hint(&bob(), "ocean".into(), 3);
        assert_eq!(g.state().hint.word, "ocean");
        assert_eq!(g.state().hint.remaining_guesses, 3);
        assert_eq!(msg.text, "Bob gave hint ocean 3");
        assert_eq!(g.state().log.last(), Some(&msg));
    }

    #[test]
    fn test_give_hint_overwrites_previous() {
        let mut g = with_hint(2);
        g.give_hint(&bob(), "sky".into(), 1);
        assert_eq!(g.state().hint.word, "sky");
        assert_eq!(g.state().hint.remaining_guesses, 1);
    }

    // =====================================================================
    // reveal()
    // =====================================================================

    #[test]
    fn test_reveal_own_card_scores_and_keeps_turn() {
        let mut g = with_hint(2);
        let idx = index_of(&g, Label::Red);

        let msg = g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.score.red, 1);
        assert_eq!(s.hint.remaining_guesses, 1);
        assert_eq!(s.hint.word, "x");
        assert_eq!(s.turn, Team::Red);
        assert_eq!(s.cards[idx].label, Label::Red);
        assert_eq!(msg.text, format!("Alice clicked on {}", s.cards[idx].name));
    }

    #[test]
    fn test_reveal_opponent_card_ends_turn() {
        let mut g = with_hint(2);
        let idx = index_of(&g, Label::Blue);

        g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.hint.remaining_guesses, 0);
        assert_eq!(s.hint.word, "");
        assert_eq!(s.turn, Team::Blue);
        assert_eq!(s.score.blue, 1);
        assert_eq!(s.score.red, 0);
    }

    #[test]
    fn test_reveal_neutral_ends_turn_without_score() {
        let mut g = with_hint(2);
        let idx = index_of(&g, Label::Neutral);

        g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.score, Score::default());
        assert_eq!(s.turn, Team::Blue);
        assert_eq!(s.hint, Hint::default());
    }

    #[test]
    fn test_reveal_assassin_behaves_like_neutral() {
        let mut g = with_hint(3);
        let idx = index_of(&g, Label::Assassin);

        g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.score, Score::default());
        assert_eq!(s.turn, Team::Blue);
        assert_eq!(s.cards[idx].label, Label::Assassin);
    }

    #[test]
    fn test_reveal_last_guess_passes_turn() {
        let mut g = with_hint(1);
        let idx = index_of(&g, Label::Red);

        g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.score.red, 1);
        assert_eq!(s.hint.remaining_guesses, 0);
        assert_eq!(s.hint.word, "");
        assert_eq!(s.turn, Team::Blue);
    }

    #[test]
    fn test_reveal_without_hint_passes_turn_without_score() {
        let mut g = game();
        let idx = index_of(&g, Label::Red);

        g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.score.red, 0);
        assert_eq!(s.turn, Team::Blue);
    }

    #[test]
    fn test_reveal_same_card_twice_scores_twice() {
        let mut g = with_hint(3);
        let idx = index_of(&g, Label::Red);

        g.reveal(&alice(), idx).unwrap();
        g.reveal(&alice(), idx).unwrap();

        let s = g.state();
        assert_eq!(s.score.red, 2);
        assert_eq!(s.hint.remaining_guesses, 1);
        assert_eq!(s.turn, Team::Red);
        let clicks = s.log.iter().filter(|m| m.text.contains("clicked on")).count();
        assert_eq!(clicks, 2);
    }

    #[test]
    fn test_reveal_out_of_range_changes_nothing() {
        let mut g = with_hint(2);
        let before = g.state().clone();
        let result = g.reveal(&alice(), 25);
        assert!(matches!(result, Err(RoomError::IndexOutOfRange(25))));
        assert_eq!(g.state(), &before);
    }

    #[test]
    fn test_reveal_zero_guesses_implies_cleared_word() {
        for label in [Label::Red, Label::Blue, Label::Neutral, Label::Assassin] {
            for count in 0..3 {
                let mut g = with_hint(count);
                let idx = index_of(&g, label);
                let turn_before = g.state().turn;
                g.reveal(&alice(), idx).unwrap();
                let s = g.state();
                if s.hint.remaining_guesses == 0 {
                    assert_eq!(s.hint.word, "");
                    assert_ne!(s.turn, turn_before);
                }
            }
        }
    }

    // =====================================================================
    // leave() / chat()
    // =====================================================================

    #[test]
    fn test_leave_logs_but_keeps_team() {
        let mut g = game();
        g.set_role(&alice(), Role::Red);
        let msg = g.leave(&alice());
        assert_eq!(msg.text, "Alice left the room");
        assert_eq!(g.state().team_red, vec![alice()]);
        assert_eq!(g.state().log.len(), 2);
    }

    #[test]
    fn test_chat_is_not_logged() {
        let g = game();
        let msg = g.chat(&alice(), "hello".into());
        assert_eq!(msg.kind, MessageKind::Chat);
        assert!(g.state().log.is_empty());
    }
}
