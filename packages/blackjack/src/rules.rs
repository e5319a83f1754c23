use crate::HandOutcome;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chip amounts. Signed so that negative requests can be rejected rather
/// than being unrepresentable.
pub type Chips = i64;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Invalid rules: {0}")]
    Invalid(&'static str),
    #[error("Payout denominator cannot be zero")]
    ZeroDenominator,
    #[error("Rules file error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, RulesError> {
        if denominator == 0 {
            return Err(RulesError::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn calculate_payout(&self, bet: Chips) -> Chips {
        bet * Chips::from(self.numerator) / Chips::from(self.denominator)
    }
}

/// Table configuration shared by the round driver and the console client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Chips handed to every newly registered player
    pub starting_chips: Chips,

    pub min_bet: Chips,

    pub max_bet: Chips,

    /// Number of decks in the shoe
    pub num_decks: u8,

    /// Dealer hits on soft 17
    pub dealer_hits_soft_17: bool,

    /// Most hands a player may hold at once through splitting
    pub max_hands: u8,

    /// Blackjack payout multiplier (commonly 3:2 or 6:5)
    pub blackjack_payout: PayoutRatio,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            starting_chips: 500,
            min_bet: 10,
            max_bet: 500,
            num_decks: 6,
            dealer_hits_soft_17: false,
            max_hands: 4,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
        }
    }
}

impl TableRules {
    /// European rules (one split)
    pub fn european() -> Self {
        Self {
            max_hands: 2,
            ..Self::default()
        }
    }

    pub fn atlantic_city() -> Self {
        Self {
            num_decks: 8,
            ..Self::default()
        }
    }

    /// Single deck rules (usually paired with 6:5 blackjack)
    pub fn single_deck() -> Self {
        Self {
            num_decks: 1,
            dealer_hits_soft_17: true,
            max_hands: 2,
            blackjack_payout: PayoutRatio::SIX_TO_FIVE,
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "european" => Some(Self::european()),
            "atlantic_city" => Some(Self::atlantic_city()),
            "single_deck" => Some(Self::single_deck()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.starting_chips < 0 {
            return Err(RulesError::Invalid("starting_chips cannot be negative"));
        }
        if self.min_bet <= 0 {
            return Err(RulesError::Invalid("min_bet must be positive"));
        }
        if self.max_bet < self.min_bet {
            return Err(RulesError::Invalid("max_bet must be at least min_bet"));
        }
        if self.num_decks == 0 {
            return Err(RulesError::Invalid("num_decks must be at least 1"));
        }
        if self.max_hands == 0 {
            return Err(RulesError::Invalid("max_hands must be at least 1"));
        }
        if self.blackjack_payout.denominator == 0 {
            return Err(RulesError::ZeroDenominator);
        }
        Ok(())
    }

    /// Parse a JSON rules file. Missing fields fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Total chips handed back to the player for a settled wager,
    /// stake included.
    pub fn return_for(&self, outcome: HandOutcome, wager: Chips) -> Chips {
        match outcome {
            HandOutcome::Win => wager * 2,
            HandOutcome::Blackjack => wager + self.blackjack_payout.calculate_payout(wager),
            HandOutcome::Push => wager,
            HandOutcome::Surrender => wager / 2,
            HandOutcome::Loss => 0,
        }
    }
}
