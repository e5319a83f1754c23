use crate::{describe_actions, Action, ActionSet, Card, HandLedger, Player};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// The other side went away before answering
    #[error("Input cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// What a player can see when asked for a decision.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub player: &'a Player,
    pub hand: Option<&'a HandLedger>,
    pub dealer_upcard: Option<Card>,
}

/// Source of player decisions.
///
/// Each call is a request/response exchange that either returns a valid
/// answer or fails with [`InputError`]; implementations keep asking until
/// the reply is acceptable.
pub trait InputProvider {
    fn choose_action(
        &mut self,
        ctx: &TurnContext<'_>,
        prompt: &str,
        allowed: &ActionSet,
    ) -> Result<Action, InputError>;

    /// An empty reply selects `default`.
    fn choose_integer(
        &mut self,
        prompt: &str,
        default: i64,
        min: i64,
        max: i64,
    ) -> Result<i64, InputError>;

    /// Called for every face-up card dealt at the table
    fn show_card(&mut self, _card: Card) {}

    /// Free-form table messages (rejections, results)
    fn report(&mut self, _message: &str) {}
}

/// Line-oriented input over any reader and writer.
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
}

impl LineInput<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<(), InputError> {
        writeln!(self.writer, "{message}")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> InputProvider for LineInput<R, W> {
    fn choose_action(
        &mut self,
        ctx: &TurnContext<'_>,
        prompt: &str,
        allowed: &ActionSet,
    ) -> Result<Action, InputError> {
        if let Some(hand) = ctx.hand {
            let cards: Vec<String> = hand.cards().iter().map(Card::to_string).collect();
            let upcard = ctx
                .dealer_upcard
                .map_or_else(|| "?".to_string(), |c| c.to_string());
            self.say(&format!(
                "Hand {} ({}) | dealer shows {} | chips {}",
                cards.join(" "),
                hand.value(),
                upcard,
                ctx.player.chips()
            ))?;
        }
        self.say(&format!("Allowed: {}", describe_actions(allowed)))?;

        loop {
            let reply = self.ask(prompt)?;
            match reply.parse::<Action>() {
                Ok(action) if allowed.contains(&action) => return Ok(action),
                _ => self.say("Not an allowed action!")?,
            }
        }
    }

    fn choose_integer(
        &mut self,
        prompt: &str,
        default: i64,
        min: i64,
        max: i64,
    ) -> Result<i64, InputError> {
        // Only the first reply may fall back to the default
        let reply = self.ask(prompt)?;
        let mut candidate = if reply.is_empty() {
            Some(default)
        } else {
            reply.parse::<i64>().ok()
        };

        loop {
            if let Some(value) = candidate {
                if (min..=max).contains(&value) {
                    return Ok(value);
                }
            }
            self.say("Not an allowed number!")?;
            self.say(&format!("Enter a number between {min} and {max}."))?;
            candidate = self.ask(prompt)?.parse::<i64>().ok();
        }
    }

    fn report(&mut self, message: &str) {
        if let Err(e) = self.say(message) {
            log::warn!("Could not write table message: {e}");
        }
    }
}
