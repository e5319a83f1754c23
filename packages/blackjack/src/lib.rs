mod card;
mod hand;
mod rules;
mod shoe;

pub use card::{Card, Rank, Suit};
pub use hand::{hand_value, is_blackjack, is_busted, is_soft, settle, HandOutcome};
pub use rules::{Chips, PayoutRatio, RulesError, TableRules};
pub use shoe::{CardSource, Shoe};
