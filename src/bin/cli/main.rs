mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phrasedeck_lib::flashcards::SelectionStrategy;
use phrasedeck_lib::LearningDirection;

#[derive(Parser)]
#[command(name = "phrasedeck-cli", about = "Phrase flashcards with weighted review", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum DirectionArg {
    FrontToBack,
    BackToFront,
}

impl From<DirectionArg> for LearningDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::FrontToBack => LearningDirection::FrontToBack,
            DirectionArg::BackToFront => LearningDirection::BackToFront,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum StrategyArg {
    Weighted,
    Highest,
}

impl From<StrategyArg> for SelectionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Weighted => SelectionStrategy::Weighted,
            StrategyArg::Highest => SelectionStrategy::Highest,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card
    Add {
        /// Front side
        front: String,
        /// Back side
        back: String,
    },

    /// List all cards, newest first
    List,

    /// Delete a card
    Delete {
        /// Card ID (prefix match)
        card: String,
    },

    /// Pick the next card to review
    Next {
        /// Card ID to avoid (usually the one just shown)
        #[arg(long)]
        exclude: Option<String>,
        /// Also print every card's weight
        #[arg(long)]
        explain: bool,
        /// Seed the random source for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record a response for a card
    Answer {
        /// Card ID (prefix match)
        card: String,
        /// The learner remembered the card
        #[arg(long, conflicts_with = "forgot", required_unless_present = "forgot")]
        remembered: bool,
        /// The learner did not remember the card
        #[arg(long)]
        forgot: bool,
    },

    /// Clear a card's review history so it is shown as new again
    Reset {
        /// Card ID (prefix match)
        card: String,
    },

    /// Interactive review session
    Review,

    /// Show deck statistics
    Stats,

    /// Show or change settings
    Settings {
        /// Which side is shown as the prompt
        #[arg(long)]
        direction: Option<DirectionArg>,
        /// How the next card is picked
        #[arg(long)]
        strategy: Option<StrategyArg>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Add { front, back } => {
            commands::add::run(&app, &front, &back, &cli.format)?;
        }
        Command::List => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Command::Delete { card } => {
            commands::delete::run(&app, &card, &cli.format)?;
        }
        Command::Next { exclude, explain, seed } => {
            commands::next::run(&app, exclude.as_deref(), explain, seed, &cli.format, use_color)?;
        }
        Command::Answer { card, remembered, forgot: _ } => {
            commands::answer::run(&app, &card, remembered, &cli.format)?;
        }
        Command::Reset { card } => {
            commands::reset::run(&app, &card, &cli.format)?;
        }
        Command::Review => {
            commands::review::run(&app, use_color)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Settings { direction, strategy } => {
            commands::settings::run(
                &app,
                direction.map(Into::into),
                strategy.map(Into::into),
                &cli.format,
            )?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
