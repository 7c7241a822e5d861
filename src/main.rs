//! bowwow - command-line front end
//!
//! Every invocation is one request: it loads the catalogue, applies a
//! single operation and prints the card plus the token to pass to the next
//! invocation.

use bowwow::{
    catalogue::{DeckCatalogue, SharedCatalogue},
    logger::{LogFormat, SessionLogger, VerbosityLevel},
    service::{self, Operation, Request, Response},
    session::{self, SaveFile},
    Result,
};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::path::PathBuf;

/// Verbosity level for diagnostics (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "bowwow")]
#[command(about = "bowwow - prompt card game sessions", long_about = None)]
struct Cli {
    /// Spreadsheet (.xlsx/.xls/.ods), text workbook (.cards) or directory of .sheet files
    #[arg(long, global = true, default_value = "cards/wnrs.cards")]
    catalogue: PathBuf,

    /// Verbosity level for diagnostics on stderr (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', global = true, default_value = "minimal")]
    verbosity: VerbosityArg,

    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Set random seed for deterministic shuffles
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List decks by category
    Decks,

    /// Start a new game over one or more decks, e.g. "Main Deck 1"
    Start {
        #[arg(value_name = "DECK_ID")]
        decks: Vec<String>,
    },

    /// Show the current card again
    Current { token: String },

    /// Move to the next card
    Next { token: String },

    /// Move back to the previous card
    Prev { token: String },

    /// Shuffle the cards not seen yet
    Shuffle { token: String },

    /// Write a save file for a game
    Save {
        token: String,

        /// Output file for the save (default: bowwow.save)
        #[arg(long, short = 'o', default_value = "bowwow.save")]
        out: PathBuf,
    },

    /// Resume a game from a save file
    Load {
        #[arg(value_name = "SAVE_FILE")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    let logger = SessionLogger::new(cli.verbosity.into(), format);

    match run(&cli, &logger).await {
        Err(e) if e.is_recoverable() => {
            eprintln!("{}", e.user_message());
            logger.event(VerbosityLevel::Verbose, "request", &format!("failed: {e}"));
            std::process::exit(2);
        }
        other => other,
    }
}

async fn run(cli: &Cli, logger: &SessionLogger) -> Result<()> {
    let shared = SharedCatalogue::new(cli.catalogue.clone());
    let start = std::time::Instant::now();
    let catalogue = shared.get().await?;
    logger.event(
        VerbosityLevel::Normal,
        "catalogue",
        &format!(
            "Loaded {} decks ({} cards) from {} in {:.2}ms",
            catalogue.len(),
            catalogue.total_cards(),
            shared.source().display(),
            start.elapsed().as_secs_f64() * 1000.0
        ),
    );

    let mut rng: Box<dyn RngCore> = match cli.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let resume = |token: &String, op: Operation| Request::Resume {
        token: token.clone(),
        op,
    };

    let request = match &cli.command {
        Commands::Decks => {
            print_decks(cli, &catalogue);
            return Ok(());
        }
        Commands::Save { token, out } => {
            let save = SaveFile::new(&session::deserialize(token)?)?;
            save.save_to_file(out)?;
            logger.event(
                VerbosityLevel::Normal,
                "save",
                &format!("Saved game to {}", out.display()),
            );
            return Ok(());
        }
        Commands::Start { decks } => Request::Start {
            decks: decks.clone(),
        },
        Commands::Current { token } => resume(token, Operation::Current),
        Commands::Next { token } => resume(token, Operation::Next),
        Commands::Prev { token } => resume(token, Operation::Previous),
        Commands::Shuffle { token } => resume(token, Operation::Shuffle),
        Commands::Load { path } => {
            let save = SaveFile::load_from_file(path)?;
            logger.event(
                VerbosityLevel::Normal,
                "save",
                &format!(
                    "Resuming {} at card {} of {}",
                    save.decks.join(", "),
                    save.position,
                    save.total
                ),
            );
            Request::Resume {
                token: save.token,
                op: Operation::Current,
            }
        }
    };

    let response = service::handle(&catalogue, &request, &mut *rng, logger)?;
    print_response(cli, &response);
    Ok(())
}

fn print_response(cli: &Cli, response: &Response) {
    if cli.json {
        match serde_json::to_string(response) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to encode response: {e}"),
        }
        return;
    }

    println!(
        "[{}] {} ({}/{})",
        response.deck_label, response.card_type, response.position, response.total
    );
    println!("{}", response.prompt);
    println!("token: {}", response.token);
}

fn print_decks(cli: &Cli, catalogue: &DeckCatalogue) {
    if cli.json {
        match serde_json::to_string(&catalogue.deck_ids()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to encode deck list: {e}"),
        }
        return;
    }

    for (category, decks) in catalogue.categories() {
        println!("{category}");
        for (name, info) in decks {
            println!("  {name} - {}", info.summary);
            println!("    {}", info.description);
            println!("    levels: {}", info.levels.join(", "));
        }
    }
}
