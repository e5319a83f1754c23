//! One player's side of a blackjack round: the hands and wagers they own,
//! their chip balance, and the turn state machine that decides which actions
//! are legal.

mod action;
mod error;
mod input;
mod ledger;
mod player;
mod table;

pub use action::{describe_actions, Action, ActionSet, UnknownAction};
pub use error::{PlayerError, PlayerResult};
pub use input::{InputError, InputProvider, LineInput, TurnContext};
pub use ledger::{HandId, HandLedger, HandStatus};
pub use player::{Player, PlayerId, TurnState, DEFAULT_NAME, STARTING_CHIPS};
pub use table::{HandResult, RoundReport, Table, TableError, TableResult};

pub use blackjack::{Card, CardSource, Chips, HandOutcome, Rank, Shoe, Suit, TableRules};
