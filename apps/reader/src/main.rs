use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use reading_core::{
    BuiltinDeck, CardLookup, MissingNarrativeGenerator, NarrativeGenerator, OpenAiNarrativeClient,
    ReadingHandle, ReadingOrchestrator,
};
use shared::{
    domain::{Reading, ReadingMode},
    draw::submission_stamp,
    error::{ApiError, ReadingError},
    modes,
    protocol::ReadingRequest,
};
use storage::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::{load_settings, normalize_database_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "reader", about = "Draw a tarot reading from a question and your numbers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available reading modes.
    Modes,
    /// Draw cards and ask for a narrative reading.
    Draw(DrawArgs),
}

#[derive(clap::Args, Debug)]
struct DrawArgs {
    #[arg(long, default_value = modes::THREE_CARD)]
    mode: String,
    #[arg(long)]
    question: String,
    /// One value per card, 1-100000. Repeat the flag for each card.
    #[arg(long = "number", required = true)]
    numbers: Vec<String>,
    #[arg(long)]
    option_a: Option<String>,
    #[arg(long)]
    option_b: Option<String>,
    /// Seed timestamp. Defaults to the sum of the current local date and time fields.
    #[arg(long)]
    timestamp: Option<i64>,
    #[arg(long)]
    database_url: Option<String>,
    /// Use built-in card names and skip the narrative service.
    #[arg(long)]
    offline: bool,
    /// Print the finished reading as JSON.
    #[arg(long)]
    json: bool,
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
            for mode in modes::catalog() {
                println!("{}", describe_mode(mode));
            }
            Ok(())
        }
        Command::Draw(args) => draw(args).await,
    }
}

async fn draw(args: DrawArgs) -> Result<()> {
    let mut settings = load_settings()?;
    if let Some(url) = &args.database_url {
        settings.database_url = normalize_database_url(url);
    }

    let lookup = card_lookup(&settings, args.offline).await?;
    let narrator = narrative_generator(&settings, args.offline)?;
    let orchestrator =
        ReadingOrchestrator::with_settings(lookup, narrator, settings.orchestrator_settings());

    let timestamp = args
        .timestamp
        .unwrap_or_else(|| submission_stamp(&Local::now()));
    let mut request = ReadingRequest::new(args.mode, args.question, args.numbers, timestamp);
    request.option_a = args.option_a;
    request.option_b = args.option_b;

    let handle = match orchestrator.produce_reading(request).await {
        Ok(handle) => handle,
        Err(err) => {
            if args.json {
                println!("{}", failure_json(&err)?);
            }
            return Err(err.into());
        }
    };
    info!(reading_id = %handle.id(), timestamp, "reader: reading submitted");

    let reading = tokio::select! {
        reading = follow(handle, !args.json) => reading,
        _ = tokio::signal::ctrl_c() => {
            warn!("reader: interrupted, reading abandoned");
            return Ok(());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!();
        println!("{}", reading.narrative.as_deref().unwrap_or_default());
    }
    Ok(())
}

fn describe_mode(mode: &ReadingMode) -> String {
    format!(
        "{:<13} {} ({} cards): {}\n{:<13} {}. {}",
        mode.id,
        mode.title,
        mode.card_count,
        mode.position_labels.join(", "),
        "",
        mode.subtitle,
        mode.description
    )
}

fn failure_json(err: &ReadingError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ApiError::from(err.clone()))
}

async fn follow(mut handle: ReadingHandle, print_cards: bool) -> Reading {
    let mut printed_cards = false;
    let mut current = handle.snapshot();
    loop {
        if print_cards && !printed_cards && !current.cards.is_empty() {
            for card in &current.cards {
                println!("{:<20} {}", card.position, card.name);
            }
            printed_cards = true;
        }
        if !current.loading {
            return current;
        }
        match handle.changed().await {
            Some(next) => current = next,
            None => return current,
        }
    }
}

async fn card_lookup(settings: &Settings, offline: bool) -> Result<Arc<dyn CardLookup>> {
    if offline {
        return Ok(Arc::new(BuiltinDeck));
    }
    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open card table at {}", settings.database_url))?;
    if storage.card_count().await? == 0 {
        warn!(
            database_url = %settings.database_url,
            "reader: card table is empty, run `tools seed-deck` to load card names"
        );
    }
    Ok(Arc::new(storage))
}

fn narrative_generator(settings: &Settings, offline: bool) -> Result<Arc<dyn NarrativeGenerator>> {
    if offline {
        return Ok(Arc::new(MissingNarrativeGenerator));
    }
    let Some(api_key) = settings.api_key() else {
        warn!("reader: no narrative API key configured, readings will use the fallback text");
        return Ok(Arc::new(MissingNarrativeGenerator));
    };
    let client = OpenAiNarrativeClient::new(
        &settings.narrative.base_url,
        api_key,
        settings.narrative.model.clone(),
    )?;
    Ok(Arc::new(client))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
