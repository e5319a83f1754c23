use crate::{
    Action, ActionSet, Card, CardSource, Chips, HandId, HandLedger, InputProvider, PlayerError,
    PlayerResult, TurnContext,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Balance every player registers with
pub const STARTING_CHIPS: Chips = 500;

/// Label used for players registered without a name
pub const DEFAULT_NAME: &str = "Human player";

/// Split cap used when the table does not set one
const DEFAULT_MAX_HANDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Where a player stands within the current turn.
///
/// `Opening` is the only state that reports `first_turn`; obtaining a
/// decision through [`Player::get_action`] always leaves it. The next
/// dispatch consumes a pending decision whether or not it succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// Turn (re)started, no decision obtained yet
    Opening,
    /// A decision was obtained but not dispatched yet. Only `action` may
    /// still use the opening set it was chosen from.
    Deciding { action: Action },
    /// The player keeps acting on the same turn
    Acting,
    Over,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: Option<String>,
    chips: Chips,
    hands: Vec<HandLedger>,
    state: TurnState,
    max_hands: usize,
}

impl Player {
    pub fn new(id: PlayerId, name: Option<String>) -> Self {
        Self {
            id,
            name,
            chips: STARTING_CHIPS,
            hands: Vec::new(),
            state: TurnState::Opening,
            max_hands: DEFAULT_MAX_HANDS,
        }
    }

    /// Fails with `InvalidAmount` on a negative balance
    pub fn with_chips(id: PlayerId, name: Option<String>, chips: Chips) -> PlayerResult<Self> {
        if chips < 0 {
            return Err(PlayerError::InvalidAmount(chips));
        }
        Ok(Self {
            chips,
            ..Self::new(id, name)
        })
    }

    /// Most hands this player may hold at once through splitting
    pub fn set_max_hands(&mut self, max_hands: usize) {
        self.max_hands = max_hands.max(1);
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn chips(&self) -> Chips {
        self.chips
    }

    pub fn hands(&self) -> &[HandLedger] {
        &self.hands
    }

    pub fn hand(&self, id: HandId) -> Option<&HandLedger> {
        self.hands.iter().find(|h| h.id() == id)
    }

    pub fn turn_state(&self) -> TurnState {
        self.state
    }

    pub fn first_turn(&self) -> bool {
        self.state == TurnState::Opening
    }

    pub fn turn_over(&self) -> bool {
        self.state == TurnState::Over
    }

    pub fn has_enough_chips(&self, min_bet: Chips) -> bool {
        self.chips >= min_bet
    }

    /// First hand still waiting for decisions, in dealing order
    pub fn next_open_hand(&self) -> Option<HandId> {
        self.hands.iter().find(|h| !h.is_resolved()).map(HandLedger::id)
    }

    // Turn lifecycle

    pub fn set_new_turn(&mut self) {
        self.state = TurnState::Opening;
    }

    pub fn set_turn_over(&mut self) {
        self.state = TurnState::Over;
    }

    /// The opening set while `first_turn` holds, the continuing set otherwise.
    pub fn get_allowed_actions(&self) -> ActionSet {
        if self.first_turn() {
            Action::ALL.into_iter().collect()
        } else {
            Action::CONTINUING.into_iter().collect()
        }
    }

    /// Ask the input provider for the next decision.
    ///
    /// Obtaining any decision ends the opening phase, so Double and Split
    /// are only offered once per turn.
    pub fn get_action(
        &mut self,
        input: &mut dyn InputProvider,
        dealer_upcard: Option<Card>,
        target: Option<HandId>,
    ) -> PlayerResult<Action> {
        if self.turn_over() {
            return Err(PlayerError::TurnOver);
        }

        let allowed = self.get_allowed_actions();
        let prompt = format!("{self}, type an action: ");
        let hand = match target {
            Some(id) => self.hand(id),
            None if self.hands.len() == 1 => self.hands.first(),
            None => None,
        };
        let ctx = TurnContext {
            player: &*self,
            hand,
            dealer_upcard,
        };
        let action = input.choose_action(&ctx, &prompt, &allowed)?;

        if !allowed.contains(&action) {
            self.state = TurnState::Acting;
            return Err(PlayerError::IllegalAction {
                action,
                reason: "not offered at this decision point",
            });
        }
        self.state = TurnState::Deciding { action };
        Ok(action)
    }

    /// Obtain a decision and carry it out. This is the gameplay entry point;
    /// returns whether the turn has ended.
    pub fn take_turn(
        &mut self,
        input: &mut dyn InputProvider,
        source: &mut dyn CardSource,
        dealer_upcard: Option<Card>,
        target: Option<HandId>,
    ) -> PlayerResult<bool> {
        let action = self.get_action(input, dealer_upcard, target)?;
        self.dispatch(action, target, source)
    }

    /// Carry out one action on the addressed hand; returns whether the turn
    /// has ended.
    ///
    /// `target` may be omitted only while the player holds a single hand.
    /// A rejected action leaves chips and hands untouched.
    pub fn dispatch(
        &mut self,
        action: Action,
        target: Option<HandId>,
        source: &mut dyn CardSource,
    ) -> PlayerResult<bool> {
        let opening = match self.state {
            TurnState::Over => {
                return Err(PlayerError::IllegalAction {
                    action,
                    reason: "the turn is over",
                })
            }
            TurnState::Opening => true,
            TurnState::Deciding { action: chosen } => {
                self.state = TurnState::Acting;
                chosen == action
            }
            TurnState::Acting => false,
        };
        if action.requires_opening() && !opening {
            return Err(PlayerError::IllegalAction {
                action,
                reason: "only allowed on the opening decision",
            });
        }

        let index = self.playable_index(action, target)?;
        let ended = match action {
            Action::Double => self.double_down(index, source)?,
            Action::Hit => self.hit(index, source),
            Action::Stand => self.stand(index),
            Action::Split => self.split(index, source)?,
            Action::Surrender => self.surrender(index),
        };
        log::debug!("{} {} on hand {}", self, action, self.hands[index].id());

        if ended {
            self.state = TurnState::Over;
        }
        Ok(ended)
    }

    // Actions

    fn double_down(&mut self, index: usize, source: &mut dyn CardSource) -> PlayerResult<bool> {
        let extra = self.hands[index].wager();
        self.remove_chips(extra)?;

        let hand = &mut self.hands[index];
        hand.double_wager();
        hand.add_card(source.deal());
        Ok(true)
    }

    /// A bust ends the turn on its own
    fn hit(&mut self, index: usize, source: &mut dyn CardSource) -> bool {
        let hand = &mut self.hands[index];
        hand.add_card(source.deal());
        hand.is_busted()
    }

    fn stand(&mut self, index: usize) -> bool {
        self.hands[index].stand();
        true
    }

    fn split(&mut self, index: usize, source: &mut dyn CardSource) -> PlayerResult<bool> {
        if self.hands.len() >= self.max_hands {
            return Err(PlayerError::IllegalAction {
                action: Action::Split,
                reason: "hand limit reached",
            });
        }
        if !self.hands[index].can_split() {
            return Err(PlayerError::IllegalAction {
                action: Action::Split,
                reason: "hand is not a pair",
            });
        }
        let wager = self.hands[index].wager();
        self.ensure_chips(wager)?;

        let mut second = self.hands[index]
            .split_off()
            .ok_or(PlayerError::IllegalAction {
                action: Action::Split,
                reason: "hand is not a pair",
            })?;
        self.chips -= wager;

        self.hands[index].add_card(source.deal());
        second.add_card(source.deal());
        self.hands.insert(index + 1, second);
        Ok(false)
    }

    fn surrender(&mut self, index: usize) -> bool {
        self.hands[index].surrender();
        true
    }

    // Betting and chips

    /// Stake `amount` on `target`, or on the first hand when no target is
    /// given. The wager and the deduction happen together or not at all.
    pub fn place_bet(&mut self, amount: Chips, target: Option<HandId>) -> PlayerResult<()> {
        if amount < 0 {
            return Err(PlayerError::InvalidAmount(amount));
        }
        self.ensure_chips(amount)?;

        let index = match target {
            Some(id) => self.index_of(id)?,
            None if self.hands.is_empty() => return Err(PlayerError::NoTargetHand { held: 0 }),
            None => 0,
        };
        self.hands[index].place_bet(amount, self.id)?;
        self.chips -= amount;
        log::debug!("{} bets {} on hand {}", self, amount, self.hands[index].id());
        Ok(())
    }

    /// Adjust the balance by `delta`, which may be negative. A change that
    /// would leave the balance below zero is rejected.
    pub fn add_chips(&mut self, delta: Chips) -> PlayerResult<()> {
        let next = self
            .chips
            .checked_add(delta)
            .ok_or(PlayerError::InvalidAmount(delta))?;
        if next < 0 {
            return Err(PlayerError::InsufficientChips {
                available: self.chips,
                required: -delta,
            });
        }
        self.chips = next;
        Ok(())
    }

    pub fn remove_chips(&mut self, amount: Chips) -> PlayerResult<()> {
        if amount < 0 {
            return Err(PlayerError::InvalidAmount(amount));
        }
        self.add_chips(-amount)
    }

    fn ensure_chips(&self, required: Chips) -> PlayerResult<()> {
        if self.chips < required {
            return Err(PlayerError::InsufficientChips {
                available: self.chips,
                required,
            });
        }
        Ok(())
    }

    // Hand management

    /// Deal a card to the player, opening a hand if they hold none.
    pub fn receive_card(&mut self, card: Card, target: Option<HandId>) -> PlayerResult<HandId> {
        let index = match (target, self.hands.len()) {
            (Some(id), _) => self.index_of(id)?,
            (None, 0) => {
                self.hands.push(HandLedger::new());
                0
            }
            (None, 1) => 0,
            (None, held) => return Err(PlayerError::NoTargetHand { held }),
        };
        let hand = &mut self.hands[index];
        hand.add_card(card);
        Ok(hand.id())
    }

    pub fn assign_hand(&mut self, hand: HandLedger) -> HandId {
        let id = hand.id();
        self.hands.push(hand);
        id
    }

    /// Hand back every owned hand for settlement
    pub fn purge_hands(&mut self) -> Vec<HandLedger> {
        std::mem::take(&mut self.hands)
    }

    pub fn purge_hand(&mut self, id: HandId) -> PlayerResult<HandLedger> {
        let index = self.index_of(id)?;
        Ok(self.hands.remove(index))
    }

    pub fn fold_hand(&mut self, id: HandId) -> PlayerResult<()> {
        let index = self.index_of(id)?;
        self.hands[index].fold();
        Ok(())
    }

    fn index_of(&self, id: HandId) -> PlayerResult<usize> {
        self.hands
            .iter()
            .position(|h| h.id() == id)
            .ok_or(PlayerError::HandNotFound(id))
    }

    fn playable_index(&self, action: Action, target: Option<HandId>) -> PlayerResult<usize> {
        let index = match (target, self.hands.len()) {
            (Some(id), _) => self.index_of(id)?,
            (None, 1) => 0,
            (None, held) => return Err(PlayerError::NoTargetHand { held }),
        };
        let hand = &self.hands[index];
        if !hand.is_active() {
            return Err(PlayerError::HandFolded(hand.id()));
        }
        if hand.is_resolved() {
            return Err(PlayerError::IllegalAction {
                action,
                reason: "hand needs no further decisions",
            });
        }
        Ok(index)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or(DEFAULT_NAME))
    }
}

#[cfg(test)]
mod tests;
