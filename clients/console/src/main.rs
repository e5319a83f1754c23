use blackjack::{Shoe, TableRules};
use blackjack_player::{InputError, InputProvider, LineInput, Table, TableError};
use clap::Parser;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "blackjack", about = "Console blackjack table")]
struct Cli {
    /// Rules preset: default, european, atlantic_city, single_deck
    #[arg(long, env = "TABLE_PRESET", default_value = "default")]
    preset: String,

    /// JSON rules file; replaces the preset
    #[arg(long, env = "TABLE_RULES_FILE")]
    rules_file: Option<std::path::PathBuf>,

    /// Player names, one per seat
    #[arg(long = "player")]
    players: Vec<String>,

    /// Seed for a reproducible shoe
    #[arg(long, env = "SHOE_SEED")]
    seed: Option<u64>,

    /// Rounds to play (0 = until input ends or everyone is broke)
    #[arg(long, default_value = "0")]
    rounds: u64,
}

fn load_rules(cli: &Cli) -> Result<TableRules, BoxErr> {
    if let Some(path) = &cli.rules_file {
        let json = std::fs::read_to_string(path)?;
        return Ok(TableRules::from_json(&json)?);
    }
    TableRules::preset(&cli.preset).ok_or_else(|| {
        format!(
            "Unknown preset '{}'. Available: default, european, atlantic_city, single_deck",
            cli.preset
        )
        .into()
    })
}

fn main() -> Result<(), BoxErr> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let rules = load_rules(&cli)?;
    rules.validate()?;

    let shoe = match cli.seed {
        Some(seed) => Shoe::seeded(rules.num_decks, seed)?,
        None => Shoe::from_entropy(rules.num_decks)?,
    };
    let mut table = Table::new(rules, shoe)?;

    if cli.players.is_empty() {
        table.register(None)?;
    }
    for name in &cli.players {
        table.register(Some(name.clone()))?;
    }

    let mut input = LineInput::stdio();
    while cli.rounds == 0 || table.rounds_played() < cli.rounds {
        if !table.has_active_players() {
            log::info!("Every player is out of chips");
            break;
        }
        match table.play_round(&mut input) {
            Ok(report) => {
                let dealer: Vec<String> = report.dealer_cards.iter().map(|c| c.to_string()).collect();
                input.report(&format!("Dealer: {}", dealer.join(" ")));
                for player in table.players() {
                    input.report(&format!("{player}: {} chips", player.chips()));
                }
            }
            Err(TableError::Input(InputError::Cancelled)) => {
                log::info!("Input closed, leaving the table");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    log::info!("Played {} round(s)", table.rounds_played());
    Ok(())
}
