use super::*;
use crate::{HandStatus, InputError, Rank, Suit};
use std::collections::VecDeque;

const EIGHT_H: Card = Card::new(Rank::Eight, Suit::Hearts);
const EIGHT_S: Card = Card::new(Rank::Eight, Suit::Spades);
const NINE_C: Card = Card::new(Rank::Nine, Suit::Clubs);
const THREE_D: Card = Card::new(Rank::Three, Suit::Diamonds);
const TEN_C: Card = Card::new(Rank::Ten, Suit::Clubs);
const KING_H: Card = Card::new(Rank::King, Suit::Hearts);
const QUEEN_S: Card = Card::new(Rank::Queen, Suit::Spades);

/// Deals cards in the order given
struct StackedDeck(VecDeque<Card>);

impl StackedDeck {
    fn new(cards: &[Card]) -> Self {
        Self(cards.iter().copied().collect())
    }
}

impl CardSource for StackedDeck {
    fn deal(&mut self) -> Card {
        self.0.pop_front().expect("stacked deck exhausted")
    }
}

/// Answers with queued actions, ignoring what is on offer
struct Scripted(VecDeque<Action>);

impl Scripted {
    fn new(actions: &[Action]) -> Self {
        Self(actions.iter().copied().collect())
    }
}

impl InputProvider for Scripted {
    fn choose_action(
        &mut self,
        _ctx: &TurnContext<'_>,
        _prompt: &str,
        _allowed: &ActionSet,
    ) -> Result<Action, InputError> {
        self.0.pop_front().ok_or(InputError::Cancelled)
    }

    fn choose_integer(
        &mut self,
        _prompt: &str,
        default: i64,
        _min: i64,
        _max: i64,
    ) -> Result<i64, InputError> {
        Ok(default)
    }
}

fn player() -> Player {
    Player::new(PlayerId(1), Some("Ada".to_string()))
}

/// Player holding one hand of `cards` with `wager` staked on it
fn seated(cards: &[Card], wager: Chips) -> (Player, HandId) {
    let mut p = player();
    let id = p.assign_hand(HandLedger::with_cards(cards.iter().copied()));
    p.place_bet(wager, None).unwrap();
    (p, id)
}

fn opening_set() -> ActionSet {
    Action::ALL.into_iter().collect()
}

fn continuing_set() -> ActionSet {
    Action::CONTINUING.into_iter().collect()
}

#[test]
fn test_new_player_defaults() {
    let p = Player::new(PlayerId(1), None);
    assert_eq!(p.chips(), 500);
    assert!(p.hands().is_empty());
    assert!(p.first_turn());
    assert!(!p.turn_over());
    assert_eq!(p.to_string(), "Human player");
    assert_eq!(player().to_string(), "Ada");
}

#[test]
fn test_with_chips_rejects_negative_balance() {
    assert!(matches!(
        Player::with_chips(PlayerId(1), None, -1),
        Err(PlayerError::InvalidAmount(-1))
    ));
    assert_eq!(Player::with_chips(PlayerId(1), None, 0).unwrap().chips(), 0);
}

#[test]
fn test_allowed_actions_follow_first_turn() {
    let mut p = player();
    assert_eq!(p.get_allowed_actions(), opening_set());

    p.state = TurnState::Acting;
    assert_eq!(p.get_allowed_actions(), continuing_set());

    p.set_turn_over();
    assert_eq!(p.get_allowed_actions(), continuing_set());

    p.set_new_turn();
    assert_eq!(p.get_allowed_actions(), opening_set());
}

#[test]
fn test_get_action_clears_first_turn() {
    let (mut p, _) = seated(&[NINE_C, THREE_D], 10);
    let mut input = Scripted::new(&[Action::Hit]);

    assert_eq!(p.get_action(&mut input, None, None).unwrap(), Action::Hit);
    assert!(!p.first_turn());
    assert_eq!(p.turn_state(), TurnState::Deciding { action: Action::Hit });
    assert_eq!(p.get_allowed_actions(), continuing_set());
}

#[test]
fn test_only_the_obtained_action_uses_the_opening() {
    let (mut p, _) = seated(&[EIGHT_H, EIGHT_S], 50);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);
    let mut input = Scripted::new(&[Action::Hit]);

    assert_eq!(p.get_action(&mut input, None, None).unwrap(), Action::Hit);
    assert_eq!(p.get_allowed_actions(), continuing_set());
    assert!(matches!(
        p.dispatch(Action::Split, None, &mut deck),
        Err(PlayerError::IllegalAction {
            action: Action::Split,
            ..
        })
    ));
    assert_eq!(p.hands().len(), 1);
    assert_eq!(p.chips(), 450);
    assert_eq!(p.turn_state(), TurnState::Acting);
}

#[test]
fn test_rejected_dispatch_consumes_the_decision() {
    let mut p = Player::with_chips(PlayerId(1), None, 80).unwrap();
    p.assign_hand(HandLedger::with_cards([NINE_C, THREE_D]));
    p.place_bet(50, None).unwrap();
    let mut deck = StackedDeck::new(&[TEN_C]);
    let mut input = Scripted::new(&[Action::Double]);

    assert_eq!(
        p.get_action(&mut input, None, None).unwrap(),
        Action::Double
    );
    assert!(matches!(
        p.dispatch(Action::Double, None, &mut deck),
        Err(PlayerError::InsufficientChips { .. })
    ));
    assert_eq!(p.turn_state(), TurnState::Acting);

    p.add_chips(100).unwrap();
    assert!(matches!(
        p.dispatch(Action::Double, None, &mut deck),
        Err(PlayerError::IllegalAction { .. })
    ));
    assert_eq!(p.hands()[0].wager(), 50);
}

#[test]
fn test_get_action_rejects_unoffered_choice() {
    let (mut p, _) = seated(&[NINE_C, THREE_D], 10);
    p.state = TurnState::Acting;
    let mut input = Scripted::new(&[Action::Double]);

    assert!(matches!(
        p.get_action(&mut input, None, None),
        Err(PlayerError::IllegalAction {
            action: Action::Double,
            ..
        })
    ));
}

#[test]
fn test_get_action_after_turn_over() {
    let (mut p, _) = seated(&[NINE_C, THREE_D], 10);
    p.set_turn_over();
    let mut input = Scripted::new(&[Action::Hit]);
    assert!(matches!(
        p.get_action(&mut input, None, None),
        Err(PlayerError::TurnOver)
    ));
}

#[test]
fn test_get_action_propagates_cancelled_input() {
    let (mut p, _) = seated(&[NINE_C, THREE_D], 10);
    let mut input = Scripted::new(&[]);
    assert!(matches!(
        p.get_action(&mut input, None, None),
        Err(PlayerError::Input(InputError::Cancelled))
    ));
}

#[test]
fn test_double_through_take_turn() {
    let (mut p, id) = seated(&[NINE_C, THREE_D], 50);
    let mut deck = StackedDeck::new(&[TEN_C]);
    let mut input = Scripted::new(&[Action::Double]);

    let ended = p.take_turn(&mut input, &mut deck, None, None).unwrap();
    assert!(ended);
    assert!(p.turn_over());

    let hand = p.hand(id).unwrap();
    assert_eq!(hand.wager(), 100);
    assert!(hand.doubled());
    assert_eq!(hand.cards().len(), 3);
    assert_eq!(p.chips(), 400);
}

#[test]
fn test_double_needs_chips_for_matching_wager() {
    let mut p = Player::with_chips(PlayerId(1), None, 80).unwrap();
    p.assign_hand(HandLedger::with_cards([NINE_C, THREE_D]));
    p.place_bet(50, None).unwrap();
    let mut deck = StackedDeck::new(&[TEN_C]);

    assert!(matches!(
        p.dispatch(Action::Double, None, &mut deck),
        Err(PlayerError::InsufficientChips {
            available: 30,
            required: 50
        })
    ));
    assert_eq!(p.chips(), 30);
    assert_eq!(p.hands()[0].wager(), 50);
    assert_eq!(p.hands()[0].cards().len(), 2);
    assert!(!p.turn_over());
}

#[test]
fn test_double_and_split_illegal_after_first_decision() {
    let (mut p, _) = seated(&[EIGHT_H, EIGHT_S], 50);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);
    let mut input = Scripted::new(&[Action::Hit, Action::Double]);

    assert!(!p.take_turn(&mut input, &mut deck, None, None).unwrap());
    assert_eq!(p.turn_state(), TurnState::Acting);

    for action in [Action::Double, Action::Split] {
        assert!(matches!(
            p.dispatch(action, None, &mut deck),
            Err(PlayerError::IllegalAction { .. })
        ));
    }
    // Not offered by the query either
    assert!(matches!(
        p.take_turn(&mut input, &mut deck, None, None),
        Err(PlayerError::IllegalAction { .. })
    ));
    assert_eq!(p.hands()[0].wager(), 50);
}

#[test]
fn test_doubled_hand_takes_no_more_cards() {
    let (mut p, id) = seated(&[EIGHT_H, THREE_D], 50);
    let mut deck = StackedDeck::new(&[TEN_C, NINE_C]);
    assert!(p.dispatch(Action::Double, None, &mut deck).unwrap());

    p.set_new_turn();
    for action in [Action::Hit, Action::Stand, Action::Double] {
        assert!(matches!(
            p.dispatch(action, Some(id), &mut deck),
            Err(PlayerError::IllegalAction { .. })
        ));
    }
    let hand = p.hand(id).unwrap();
    assert_eq!(hand.cards().len(), 3);
    assert_eq!(hand.wager(), 100);
    assert_eq!(p.chips(), 400);
}

#[test]
fn test_stood_hand_rejects_actions_after_new_turn() {
    let (mut p, id) = seated(&[TEN_C, EIGHT_H], 10);
    let mut deck = StackedDeck::new(&[THREE_D]);
    p.dispatch(Action::Stand, None, &mut deck).unwrap();

    p.set_new_turn();
    assert!(matches!(
        p.dispatch(Action::Hit, None, &mut deck),
        Err(PlayerError::IllegalAction { .. })
    ));
    assert_eq!(p.hand(id).unwrap().cards().len(), 2);
}

#[test]
fn test_hit_keeps_turn_active() {
    let (mut p, id) = seated(&[NINE_C, THREE_D], 10);
    let mut deck = StackedDeck::new(&[EIGHT_H]);
    let mut input = Scripted::new(&[Action::Hit]);

    assert!(!p.take_turn(&mut input, &mut deck, None, None).unwrap());
    assert!(!p.turn_over());
    assert_eq!(p.hand(id).unwrap().value(), 20);
}

#[test]
fn test_hit_bust_ends_turn() {
    let (mut p, id) = seated(&[KING_H, QUEEN_S], 10);
    let mut deck = StackedDeck::new(&[THREE_D]);

    assert!(p.dispatch(Action::Hit, None, &mut deck).unwrap());
    assert!(p.turn_over());
    assert!(p.hand(id).unwrap().is_busted());
}

#[test]
fn test_stand_ends_turn_without_drawing() {
    let (mut p, id) = seated(&[KING_H, QUEEN_S], 10);
    let mut deck = StackedDeck::new(&[]);

    assert!(p.dispatch(Action::Stand, None, &mut deck).unwrap());
    assert!(p.turn_over());
    assert!(p.hand(id).unwrap().stood());
    assert_eq!(p.hand(id).unwrap().cards().len(), 2);
}

#[test]
fn test_surrender_folds_hand_and_ends_turn() {
    let (mut p, id) = seated(&[TEN_C, EIGHT_H], 40);
    let mut deck = StackedDeck::new(&[]);

    assert!(p.dispatch(Action::Surrender, None, &mut deck).unwrap());
    assert!(p.turn_over());
    let hand = p.hand(id).unwrap();
    assert!(hand.surrendered());
    assert_eq!(hand.status(), HandStatus::Folded);
    // Settlement decides the refund
    assert_eq!(hand.wager(), 40);
    assert_eq!(p.chips(), 460);
}

#[test]
fn test_turn_over_stays_until_reset() {
    let (mut p, _) = seated(&[TEN_C, EIGHT_H], 10);
    let mut deck = StackedDeck::new(&[]);
    p.dispatch(Action::Stand, None, &mut deck).unwrap();

    assert!(matches!(
        p.dispatch(Action::Hit, None, &mut deck),
        Err(PlayerError::IllegalAction { .. })
    ));
    assert!(p.turn_over());

    p.set_new_turn();
    assert!(p.first_turn());
    assert!(!p.turn_over());
}

#[test]
fn test_split_pair_of_eights() {
    let (mut p, id) = seated(&[EIGHT_H, EIGHT_S], 50);
    assert_eq!(p.chips(), 450);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);

    let ended = p.dispatch(Action::Split, None, &mut deck).unwrap();
    assert!(!ended);
    assert!(!p.turn_over());
    assert!(p.first_turn());

    assert_eq!(p.hands().len(), 2);
    assert_eq!(p.hands()[0].id(), id);
    assert_eq!(p.hands()[0].cards(), &[EIGHT_H, THREE_D]);
    assert_eq!(p.hands()[1].cards(), &[EIGHT_S, TEN_C]);
    assert!(p.hands().iter().all(|h| h.wager() == 50));
    assert_eq!(p.chips(), 400);
}

#[test]
fn test_split_requires_equal_ranks() {
    let (mut p, _) = seated(&[KING_H, QUEEN_S], 50);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);

    assert!(matches!(
        p.dispatch(Action::Split, None, &mut deck),
        Err(PlayerError::IllegalAction {
            action: Action::Split,
            ..
        })
    ));
    assert_eq!(p.hands().len(), 1);
    assert_eq!(p.chips(), 450);
}

#[test]
fn test_split_requires_chips_to_match_wager() {
    let mut p = Player::with_chips(PlayerId(1), None, 90).unwrap();
    p.assign_hand(HandLedger::with_cards([EIGHT_H, EIGHT_S]));
    p.place_bet(50, None).unwrap();
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);

    assert!(matches!(
        p.dispatch(Action::Split, None, &mut deck),
        Err(PlayerError::InsufficientChips { .. })
    ));
    assert_eq!(p.hands().len(), 1);
    assert_eq!(p.hands()[0].cards(), &[EIGHT_H, EIGHT_S]);
    assert_eq!(p.chips(), 40);
}

#[test]
fn test_split_respects_hand_limit() {
    let (mut p, _) = seated(&[EIGHT_H, EIGHT_S], 10);
    p.set_max_hands(1);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);

    assert!(matches!(
        p.dispatch(Action::Split, None, &mut deck),
        Err(PlayerError::IllegalAction {
            reason: "hand limit reached",
            ..
        })
    ));
}

#[test]
fn test_actions_need_a_target_once_split() {
    let (mut p, _) = seated(&[EIGHT_H, EIGHT_S], 10);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C, THREE_D]);
    p.dispatch(Action::Split, None, &mut deck).unwrap();

    assert!(matches!(
        p.dispatch(Action::Hit, None, &mut deck),
        Err(PlayerError::NoTargetHand { held: 2 })
    ));

    let second = p.hands()[1].id();
    assert!(!p.dispatch(Action::Hit, Some(second), &mut deck).unwrap());
    assert_eq!(p.hands()[1].cards().len(), 3);
}

#[test]
fn test_dispatch_skips_folded_hands() {
    let (mut p, id) = seated(&[TEN_C, EIGHT_H], 10);
    p.fold_hand(id).unwrap();
    let mut deck = StackedDeck::new(&[THREE_D]);

    assert!(matches!(
        p.dispatch(Action::Hit, Some(id), &mut deck),
        Err(PlayerError::HandFolded(_))
    ));
}

#[test]
fn test_place_bet_without_hand() {
    let mut p = player();
    assert!(matches!(
        p.place_bet(100, None),
        Err(PlayerError::NoTargetHand { held: 0 })
    ));
    assert_eq!(p.chips(), 500);
}

#[test]
fn test_place_bet_insufficient_chips() {
    let mut p = Player::with_chips(PlayerId(1), None, 30).unwrap();
    let id = p.assign_hand(HandLedger::new());

    assert!(matches!(
        p.place_bet(50, None),
        Err(PlayerError::InsufficientChips {
            available: 30,
            required: 50
        })
    ));
    assert_eq!(p.chips(), 30);
    assert_eq!(p.hand(id).unwrap().wager(), 0);
}

#[test]
fn test_place_bet_rejects_negative_amount() {
    let mut p = player();
    p.assign_hand(HandLedger::new());
    assert!(matches!(
        p.place_bet(-10, None),
        Err(PlayerError::InvalidAmount(-10))
    ));
    assert_eq!(p.chips(), 500);
}

#[test]
fn test_place_bet_is_all_or_nothing() {
    let (mut p, id) = seated(&[TEN_C], 50);
    // Second bet on the same hand is refused and costs nothing
    assert!(matches!(
        p.place_bet(20, Some(id)),
        Err(PlayerError::BetAlreadyPlaced(_))
    ));
    assert_eq!(p.chips(), 450);
    assert_eq!(p.hand(id).unwrap().wager(), 50);
}

#[test]
fn test_place_bet_defaults_to_first_hand() {
    let mut p = player();
    let first = p.assign_hand(HandLedger::new());
    let second = p.assign_hand(HandLedger::new());

    p.place_bet(25, None).unwrap();
    assert_eq!(p.hand(first).unwrap().wager(), 25);
    assert_eq!(p.hand(second).unwrap().wager(), 0);
    assert_eq!(p.hand(first).unwrap().bettor(), Some(PlayerId(1)));
}

#[test]
fn test_chip_adjustments() {
    let mut p = player();
    p.add_chips(50).unwrap();
    assert_eq!(p.chips(), 550);

    p.add_chips(-50).unwrap();
    assert_eq!(p.chips(), 500);

    assert!(matches!(
        p.remove_chips(-1),
        Err(PlayerError::InvalidAmount(-1))
    ));
    assert!(matches!(
        p.remove_chips(501),
        Err(PlayerError::InsufficientChips { .. })
    ));
    assert!(matches!(
        p.add_chips(-501),
        Err(PlayerError::InsufficientChips { .. })
    ));
    assert_eq!(p.chips(), 500);

    p.remove_chips(500).unwrap();
    assert_eq!(p.chips(), 0);
    assert!(!p.has_enough_chips(10));
}

#[test]
fn test_receive_card_opens_first_hand() {
    let mut p = player();
    let id = p.receive_card(TEN_C, None).unwrap();
    assert_eq!(p.hands().len(), 1);
    assert_eq!(p.receive_card(NINE_C, None).unwrap(), id);
    assert_eq!(p.hand(id).unwrap().cards(), &[TEN_C, NINE_C]);
}

#[test]
fn test_receive_card_needs_target_with_many_hands() {
    let mut p = player();
    p.assign_hand(HandLedger::new());
    let second = p.assign_hand(HandLedger::new());

    assert!(matches!(
        p.receive_card(TEN_C, None),
        Err(PlayerError::NoTargetHand { held: 2 })
    ));
    assert_eq!(p.receive_card(TEN_C, Some(second)).unwrap(), second);
}

#[test]
fn test_purge_hands_returns_everything_owned() {
    let mut p = player();
    let first = p.assign_hand(HandLedger::new());
    let second = p.assign_hand(HandLedger::new());

    let purged: Vec<HandId> = p.purge_hands().iter().map(HandLedger::id).collect();
    assert_eq!(purged, vec![first, second]);
    assert!(p.hands().is_empty());
}

#[test]
fn test_purge_hand_by_id() {
    let mut p = player();
    let first = p.assign_hand(HandLedger::new());
    let second = p.assign_hand(HandLedger::new());

    assert_eq!(p.purge_hand(first).unwrap().id(), first);
    assert_eq!(p.hands().len(), 1);
    assert_eq!(p.hands()[0].id(), second);
    assert!(matches!(
        p.purge_hand(first),
        Err(PlayerError::HandNotFound(_))
    ));
}

#[test]
fn test_next_open_hand_skips_resolved() {
    let (mut p, first) = seated(&[EIGHT_H, EIGHT_S], 10);
    let mut deck = StackedDeck::new(&[THREE_D, TEN_C]);
    p.dispatch(Action::Split, None, &mut deck).unwrap();
    let second = p.hands()[1].id();

    assert_eq!(p.next_open_hand(), Some(first));
    p.dispatch(Action::Stand, Some(first), &mut deck).unwrap();
    assert_eq!(p.next_open_hand(), Some(second));
}
