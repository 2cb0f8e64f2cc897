use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{CardIndex, CardRecord},
    draw::DECK_SIZE,
    modes,
};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tools", about = "Maintain the tarot card table")]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/TAROT.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the standard 156-row deck, leaving existing rows untouched.
    SeedDeck,
    /// Upsert cards from a JSON array of `{ "index", "name", "meaning" }` objects.
    Import { path: PathBuf },
    Show { index: i64 },
    Modes,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Modes => {
            print_modes();
            Ok(())
        }
        command => run(&cli.database_url, command).await,
    }
}

fn print_modes() {
    for mode in modes::catalog() {
        println!(
            "{}\t{}\t{}\t{}",
            mode.id, mode.card_count, mode.title, mode.subtitle
        );
    }
}

async fn run(database_url: &str, command: Command) -> Result<()> {
    let storage = Storage::new(database_url).await?;

    match command {
        Command::SeedDeck => {
            let inserted = storage.seed_standard_deck().await?;
            let total = storage.card_count().await?;
            println!("seeded {inserted} cards, table now holds {total}");
        }
        Command::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let cards: Vec<CardRecord> = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse card list in {}", path.display()))?;
            if let Some(card) = cards.iter().find(|c| !(0..DECK_SIZE).contains(&c.index.0)) {
                bail!("card index {} is outside 0..{DECK_SIZE}", card.index);
            }
            let written = storage.import_cards(&cards).await?;
            info!(path = %path.display(), written, "tools: import finished");
            println!("imported {written} cards");
        }
        Command::Show { index } => match storage.card(CardIndex(index)).await? {
            Some(card) => {
                println!("{}\t{}", card.index, card.name);
                if let Some(meaning) = card.meaning {
                    println!("{meaning}");
                }
            }
            None => println!("no card stored at index {index}"),
        },
        Command::Modes => print_modes(),
    }

    Ok(())
}
