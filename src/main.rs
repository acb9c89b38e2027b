use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use flashcards_srs::export::json::{export_states_to_path, import_deck, import_states};
use flashcards_srs::models::{CardFilter, Clock, OffsetClock, Rating, preview_intervals};
use flashcards_srs::{Card, Deck, ReviewSession, SqliteStateStore, StateStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Review due flashcards in the terminal, scheduled with SM-2.
#[derive(Parser)]
#[command(name = "flashcards", version)]
struct Cli {
    /// Deck JSON file. A small sample deck is used when omitted.
    #[arg(long)]
    deck: Option<PathBuf>,

    /// SQLite file holding the scheduling state of every reviewed card
    #[arg(long, default_value = "db.sqlite3")]
    database: PathBuf,

    /// Only review cards carrying one of these tags
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Only review cards whose text contains this string
    #[arg(long)]
    query: Option<String>,

    /// Seed for the card order, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Pretend the session happens this many days from now
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset_days: i64,

    /// Load card states from a JSON file before reviewing
    #[arg(long)]
    import: Option<PathBuf>,

    /// Forget all stored states before importing
    #[arg(long, requires = "import")]
    reset_on_import: bool,

    /// Write all card states to a JSON file after reviewing
    #[arg(long)]
    export: Option<PathBuf>,
}

fn sample_deck() -> Deck {
    Deck {
        name: "Polish Vocabulary".to_string(),
        cards: vec![
            Card::new("pl-czesc", "cześć", "hello").with_tags(["greetings"]),
            Card::new("pl-dziekuje", "dziękuję", "thank you").with_tags(["phrases"]),
            Card::new("pl-prosze", "proszę", "please").with_tags(["phrases"]),
        ],
    }
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn format_interval(days: i64) -> String {
    match days {
        i64::MIN..=0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

/// Prints `message` and reads one trimmed line. `None` on end of input.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    message: &str,
) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn run_session<S: StateStore>(
    session: &mut ReviewSession<S>,
    clock: &impl Clock,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    while let Some(card) = session.current_card() {
        let front = card.front.clone();
        let back = card.back.clone();

        println!();
        println!("{}", session.progress_message());
        println!("  {}", front);
        match prompt(lines, "[Enter] to show answer, q to quit: ")?.as_deref() {
            None | Some("q") => return Ok(()),
            Some(_) => {}
        }

        session.toggle_back();
        println!("  {}", back);

        let previews = preview_intervals(session.current_state()?.as_ref());
        let options: Vec<String> = Rating::ALL
            .iter()
            .zip(previews)
            .enumerate()
            .map(|(i, (rating, days))| {
                format!("{}) {} ({})", i + 1, rating.label(), format_interval(days))
            })
            .collect();

        let rating = loop {
            let Some(answer) = prompt(lines, &format!("{}: ", options.join("  ")))? else {
                return Ok(());
            };
            if answer == "q" {
                return Ok(());
            }
            match answer.parse().ok().and_then(Rating::from_button) {
                Some(rating) => break rating,
                None => println!("Please answer 1-4."),
            }
        };

        if let Some(state) = session.rate_with(rating, clock.now())? {
            println!("Next review on {}", format_timestamp(state.next_review));
        }
        session.next_card();
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut store = SqliteStateStore::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;

    if let Some(path) = &cli.import {
        let count = import_states(&mut store, path, cli.reset_on_import)
            .with_context(|| format!("Failed to import states from {}", path.display()))?;
        println!("Imported {} card states", count);
    }

    let deck = match &cli.deck {
        Some(path) => import_deck(path)
            .with_context(|| format!("Failed to load deck {}", path.display()))?,
        None => sample_deck(),
    };

    let filter = CardFilter {
        tags: cli.tags.clone(),
        query: cli.query.clone(),
    };
    let clock = OffsetClock {
        offset_days: cli.offset_days,
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = ReviewSession::start(deck, store, filter, clock.now(), &mut rng)?;
    println!(
        "{}: {} cards due on {}",
        session.deck_name,
        session.total_count(),
        format_timestamp(clock.now())
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    run_session(&mut session, &clock, &mut lines)?;

    let stats = session.stats();
    println!();
    println!("Reviewed {} cards, {} correct", stats.reviewed, stats.correct);

    if let Some(path) = &cli.export {
        let count = export_states_to_path(session.store(), path)
            .with_context(|| format!("Failed to export states to {}", path.display()))?;
        println!("Exported {} card states to {}", count, path.display());
    }

    Ok(())
}
