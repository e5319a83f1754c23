use crate::{Card, RulesError};
use rand::seq::SliceRandom;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Anything that can hand out the next card.
///
/// The turn engine only ever asks for one card at a time, so tests can stack
/// a deck in a fixed order while real play draws from a [`Shoe`].
pub trait CardSource {
    fn deal(&mut self) -> Card;
}

/// A shuffled multi-deck shoe. Rebuilds and reshuffles itself when empty.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: u8,
    rng: ChaCha8Rng,
}

impl Shoe {
    pub fn new(num_decks: u8, rng: ChaCha8Rng) -> Result<Self, RulesError> {
        if num_decks == 0 {
            return Err(RulesError::Invalid("Shoe needs at least one deck"));
        }
        let mut shoe = Self {
            cards: Vec::with_capacity(52 * num_decks as usize),
            num_decks,
            rng,
        };
        shoe.refill();
        Ok(shoe)
    }

    /// Reproducible shoe for replays and tests
    pub fn seeded(num_decks: u8, seed: u64) -> Result<Self, RulesError> {
        Self::new(num_decks, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(num_decks: u8) -> Result<Self, RulesError> {
        Self::new(num_decks, ChaCha8Rng::from_entropy())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    fn refill(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            self.cards.extend(Card::deck());
        }
        self.cards.shuffle(&mut self.rng);
        log::debug!("Shuffled {} deck(s) into the shoe", self.num_decks);
    }
}

impl CardSource for Shoe {
    fn deal(&mut self) -> Card {
        // `refill` always leaves 52 * num_decks cards, and num_decks >= 1
        loop {
            if let Some(card) = self.cards.pop() {
                return card;
            }
            self.refill();
        }
    }
}
