use crate::{Action, Chips, HandId, InputError};
use thiserror::Error;

/// Rejections raised by the turn engine and its hand ledgers. None of them
/// are fatal: the state that was asked to change is left untouched.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Insufficient chips: available {available}, required {required}")]
    InsufficientChips { available: Chips, required: Chips },

    /// Negative amount handed to a chip operation
    #[error("Invalid amount: {0}")]
    InvalidAmount(Chips),

    /// Negative wager handed to a hand ledger
    #[error("Invalid bet: {0}")]
    InvalidBet(Chips),

    #[error("Hand {0} already carries a wager")]
    BetAlreadyPlaced(HandId),

    #[error("No target hand: player holds {held} hand(s)")]
    NoTargetHand { held: usize },

    #[error("Hand {0} not found")]
    HandNotFound(HandId),

    #[error("Hand {0} is folded")]
    HandFolded(HandId),

    #[error("Illegal action {action}: {reason}")]
    IllegalAction { action: Action, reason: &'static str },

    #[error("Turn is over")]
    TurnOver,

    #[error(transparent)]
    Input(#[from] InputError),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
