use crate::{Card, Rank};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
    Surrender,
    Blackjack,
}

/// Returns the best total and how many aces are still counted as 11.
fn total_and_soft_aces(cards: &[Card]) -> (u8, u8) {
    let mut total: u8 = 0;
    let mut aces = 0;

    for card in cards {
        if card.rank == Rank::Ace {
            aces += 1;
        }
        total = total.saturating_add(card.value());
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total, aces)
}

/// Calculate the value of a blackjack hand
pub fn hand_value(cards: &[Card]) -> u8 {
    total_and_soft_aces(cards).0
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft(cards: &[Card]) -> bool {
    let (total, aces) = total_and_soft_aces(cards);
    aces > 0 && total <= 21
}

pub fn is_busted(cards: &[Card]) -> bool {
    hand_value(cards) > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

/// Decide a finished player hand against the dealer's final cards.
///
/// A two-card 21 made after a split counts as an ordinary 21.
pub fn settle(player: &[Card], dealer: &[Card], surrendered: bool, from_split: bool) -> HandOutcome {
    if surrendered {
        return HandOutcome::Surrender;
    }
    if is_busted(player) {
        return HandOutcome::Loss;
    }

    let player_natural = !from_split && is_blackjack(player);
    let dealer_natural = is_blackjack(dealer);
    match (player_natural, dealer_natural) {
        (true, true) => return HandOutcome::Push,
        (true, false) => return HandOutcome::Blackjack,
        (false, true) => return HandOutcome::Loss,
        (false, false) => {}
    }

    if is_busted(dealer) {
        return HandOutcome::Win;
    }

    let (ours, theirs) = (hand_value(player), hand_value(dealer));
    if ours > theirs {
        HandOutcome::Win
    } else if ours < theirs {
        HandOutcome::Loss
    } else {
        HandOutcome::Push
    }
}
