use crate::{
    Card, CardSource, Chips, HandId, HandLedger, HandOutcome, InputError, InputProvider, Player,
    PlayerError, PlayerId, TableRules,
};
use blackjack::RulesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Player {0} is not registered")]
    UnknownPlayer(PlayerId),
}

pub type TableResult<T> = Result<T, TableError>;

/// Settlement of one hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandResult {
    pub player: PlayerId,
    pub hand: HandId,
    pub cards: Vec<Card>,
    pub wager: Chips,
    pub outcome: HandOutcome,
    /// Chips handed back, stake included
    pub returned: Chips,
}

impl HandResult {
    pub fn net(&self) -> Chips {
        self.returned - self.wager
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundReport {
    pub dealer_cards: Vec<Card>,
    pub hands: Vec<HandResult>,
    /// Players who could not cover the minimum bet
    pub sat_out: Vec<PlayerId>,
}

impl RoundReport {
    pub fn net_for(&self, player: PlayerId) -> Chips {
        self.hands
            .iter()
            .filter(|h| h.player == player)
            .map(HandResult::net)
            .sum()
    }
}

/// Round driver: seats players, deals, sequences turns, plays the dealer and
/// settles every hand.
pub struct Table<S> {
    rules: TableRules,
    source: S,
    players: Vec<Player>,
    next_player_id: u32,
    rounds_played: u64,
}

impl<S: CardSource> Table<S> {
    pub fn new(rules: TableRules, source: S) -> TableResult<Self> {
        rules.validate()?;
        Ok(Self {
            rules,
            source,
            players: Vec::new(),
            next_player_id: 1,
            rounds_played: 0,
        })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn register(&mut self, name: Option<String>) -> TableResult<PlayerId> {
        let id = PlayerId(self.next_player_id);
        let mut player = Player::with_chips(id, name, self.rules.starting_chips)?;
        player.set_max_hands(self.rules.max_hands as usize);
        self.next_player_id += 1;

        log::info!("{player} joins with {} chips", player.chips());
        self.players.push(player);
        Ok(id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> TableResult<&Player> {
        self.players
            .iter()
            .find(|p| p.id() == id)
            .ok_or(TableError::UnknownPlayer(id))
    }

    /// True while anyone can still cover the minimum bet
    pub fn has_active_players(&self) -> bool {
        self.players
            .iter()
            .any(|p| p.has_enough_chips(self.rules.min_bet))
    }

    /// Play one full round. When it fails part way, every unsettled hand is
    /// dropped and its wager returned before the error is passed on.
    pub fn play_round(&mut self, input: &mut dyn InputProvider) -> TableResult<RoundReport> {
        self.rounds_played += 1;
        log::info!("Round {} starting", self.rounds_played);

        let mut report = RoundReport::default();
        let mut seated = Vec::new();
        for (index, player) in self.players.iter().enumerate() {
            if player.has_enough_chips(self.rules.min_bet) {
                seated.push(index);
            } else {
                report.sat_out.push(player.id());
            }
        }
        if seated.is_empty() {
            log::info!("Nobody can cover the minimum bet of {}", self.rules.min_bet);
            return Ok(report);
        }

        match self.run_round(&seated, input, report) {
            Ok(report) => Ok(report),
            Err(e) => {
                self.abandon_round(&seated);
                Err(e)
            }
        }
    }

    fn run_round(
        &mut self,
        seated: &[usize],
        input: &mut dyn InputProvider,
        mut report: RoundReport,
    ) -> TableResult<RoundReport> {
        let mut dealer = Vec::with_capacity(2);
        for hole in [false, true] {
            for &index in seated {
                let card = self.source.deal();
                self.players[index].receive_card(card, None)?;
                input.show_card(card);
            }
            let card = self.source.deal();
            if !hole {
                input.show_card(card);
            }
            dealer.push(card);
        }

        for &index in seated {
            self.collect_bet(index, input)?;
        }

        let upcard = dealer.first().copied();
        if blackjack::is_blackjack(&dealer) {
            log::info!("Dealer has blackjack");
            input.report("Dealer has blackjack.");
        } else {
            for &index in seated {
                self.play_hands(index, upcard, input)?;
            }
        }

        if let Some(&hole) = dealer.get(1) {
            input.show_card(hole);
        }
        while self.dealer_should_hit(&dealer) {
            let card = self.source.deal();
            input.show_card(card);
            dealer.push(card);
        }
        log::info!(
            "Dealer finishes on {} with {} card(s)",
            blackjack::hand_value(&dealer),
            dealer.len()
        );

        for &index in seated {
            let hands = self.players[index].purge_hands();
            for hand in hands {
                let result = self.settle_hand(index, hand, &dealer)?;
                input.report(&format!(
                    "{}: {:?} ({:+})",
                    self.players[index],
                    result.outcome,
                    result.net()
                ));
                report.hands.push(result);
            }
        }
        report.dealer_cards = dealer;
        Ok(report)
    }

    /// Stake on the hand the deal opened
    fn collect_bet(&mut self, index: usize, input: &mut dyn InputProvider) -> TableResult<()> {
        let min = self.rules.min_bet;
        let max = self.rules.max_bet.min(self.players[index].chips());

        let player = &mut self.players[index];
        let prompt = format!("{player}, place your bet ({min}-{max}) [{min}]: ");
        let amount = input.choose_integer(&prompt, min, min, max)?;
        player.place_bet(amount, None)?;
        Ok(())
    }

    /// Drop the hands of a failed round and hand their wagers back
    fn abandon_round(&mut self, seated: &[usize]) {
        for &index in seated {
            let player = &mut self.players[index];
            let staked: Chips = player.purge_hands().iter().map(HandLedger::wager).sum();
            player.set_new_turn();
            if staked == 0 {
                continue;
            }
            match player.add_chips(staked) {
                Ok(()) => log::info!("{player} takes back {staked} from an abandoned round"),
                Err(e) => log::warn!("{player}: could not refund {staked}: {e}"),
            }
        }
    }

    /// Each unresolved hand gets a turn of its own; hands created by a split
    /// are queued behind the hand they came from. A split restarts the turn,
    /// so both halves get the opening actions.
    fn play_hands(
        &mut self,
        index: usize,
        upcard: Option<Card>,
        input: &mut dyn InputProvider,
    ) -> TableResult<()> {
        let player = &mut self.players[index];
        while let Some(hand) = player.next_open_hand() {
            player.set_new_turn();
            while !player.turn_over() {
                if player.hand(hand).map_or(true, HandLedger::is_resolved) {
                    player.set_turn_over();
                    break;
                }
                let held = player.hands().len();
                match player.take_turn(input, &mut self.source, upcard, Some(hand)) {
                    Ok(false) if player.hands().len() > held => player.set_new_turn(),
                    Ok(_) => {}
                    Err(PlayerError::Input(e)) => return Err(e.into()),
                    Err(e) => {
                        log::warn!("{player}: {e}");
                        input.report(&e.to_string());
                    }
                }
            }
        }
        Ok(())
    }

    fn dealer_should_hit(&self, dealer: &[Card]) -> bool {
        let value = blackjack::hand_value(dealer);
        value < 17 || (value == 17 && self.rules.dealer_hits_soft_17 && blackjack::is_soft(dealer))
    }

    fn settle_hand(
        &mut self,
        index: usize,
        hand: HandLedger,
        dealer: &[Card],
    ) -> TableResult<HandResult> {
        let outcome = blackjack::settle(hand.cards(), dealer, hand.surrendered(), hand.from_split());
        let returned = self.rules.return_for(outcome, hand.wager());

        let player = &mut self.players[index];
        player.add_chips(returned)?;
        log::info!(
            "{player} hand {}: {:?}, wager {}, returned {}",
            hand.id(),
            outcome,
            hand.wager(),
            returned
        );

        Ok(HandResult {
            player: player.id(),
            hand: hand.id(),
            cards: hand.cards().to_vec(),
            wager: hand.wager(),
            outcome,
            returned,
        })
    }
}
