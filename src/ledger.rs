use crate::{Card, Chips, PlayerError, PlayerId, PlayerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HAND_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique hand identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandId(u64);

impl HandId {
    fn next() -> Self {
        Self(NEXT_HAND_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Active,
    /// Out of play; cards and wager stay for settlement
    Folded,
}

/// Cards and wager of one playing hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLedger {
    id: HandId,
    cards: Vec<Card>,
    wager: Chips,
    bettor: Option<PlayerId>,
    status: HandStatus,
    stood: bool,
    doubled: bool,
    surrendered: bool,
    from_split: bool,
}

impl HandLedger {
    pub fn new() -> Self {
        Self {
            id: HandId::next(),
            cards: Vec::new(),
            wager: 0,
            bettor: None,
            status: HandStatus::Active,
            stood: false,
            doubled: false,
            surrendered: false,
            from_split: false,
        }
    }

    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut hand = Self::new();
        hand.cards.extend(cards);
        hand
    }

    pub fn id(&self) -> HandId {
        self.id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn wager(&self) -> Chips {
        self.wager
    }

    /// Player whose chips back the wager
    pub fn bettor(&self) -> Option<PlayerId> {
        self.bettor
    }

    pub fn status(&self) -> HandStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == HandStatus::Active
    }

    pub fn stood(&self) -> bool {
        self.stood
    }

    pub fn doubled(&self) -> bool {
        self.doubled
    }

    pub fn surrendered(&self) -> bool {
        self.surrendered
    }

    pub fn from_split(&self) -> bool {
        self.from_split
    }

    pub fn value(&self) -> u8 {
        blackjack::hand_value(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        blackjack::is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        blackjack::is_blackjack(&self.cards)
    }

    pub fn can_split(&self) -> bool {
        matches!(self.cards.as_slice(), [first, second] if first.pairs_with(second))
    }

    /// True once the hand needs no further decisions this round
    pub fn is_resolved(&self) -> bool {
        !self.is_active() || self.stood || self.doubled || self.is_busted() || self.is_blackjack()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Record the wager for this hand. A hand takes one wager; doubling and
    /// splitting go through the owning player instead.
    pub fn place_bet(&mut self, amount: Chips, bettor: PlayerId) -> PlayerResult<()> {
        if amount < 0 {
            return Err(PlayerError::InvalidBet(amount));
        }
        if self.bettor.is_some() {
            return Err(PlayerError::BetAlreadyPlaced(self.id));
        }
        self.wager = amount;
        self.bettor = Some(bettor);
        Ok(())
    }

    pub fn fold(&mut self) {
        self.status = HandStatus::Folded;
    }

    pub(crate) fn stand(&mut self) {
        self.stood = true;
    }

    pub(crate) fn double_wager(&mut self) {
        self.wager *= 2;
        self.doubled = true;
    }

    pub(crate) fn surrender(&mut self) {
        self.surrendered = true;
        self.fold();
    }

    /// Move the second card of a pair into a fresh ledger carrying the same
    /// wager. Both halves are marked as split hands.
    pub(crate) fn split_off(&mut self) -> Option<HandLedger> {
        if !self.can_split() {
            return None;
        }
        let second = self.cards.pop()?;

        let mut other = HandLedger::with_cards([second]);
        other.wager = self.wager;
        other.bettor = self.bettor;
        other.from_split = true;
        self.from_split = true;
        Some(other)
    }
}

impl Default for HandLedger {
    fn default() -> Self {
        Self::new()
    }
}
