//! Skribbl console bot
//!
//! Plays the reveal game in a terminal: bot messages go to stdout, lines typed
//! on stdin are guesses and commands.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use skribbl::{
    commands::CommandDispatcher,
    console::{ConsoleTransport, CONSOLE_CHANNEL},
    word_source::{CatalogWordSource, StaticWordSource},
    ConfigLoader, RevealGameEngine, SkribblConfig, SkribblResult, User, WordCard, WordSource,
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Skribbl CLI
#[derive(Parser)]
#[command(name = "skribbl")]
#[command(about = "Chat word-guessing game with progressive letter reveals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed for letter selection (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single round right away
    Play {
        /// Round length in seconds
        #[arg(short, long)]
        duration: Option<u32>,

        /// Fraction (0-1] of the word to reveal before the round ends
        #[arg(short = 'f', long)]
        reveal_fraction: Option<f64>,

        /// Secret word (picked from the catalog when omitted)
        #[arg(short, long)]
        word: Option<String>,

        /// Image shown with the word
        #[arg(short, long, default_value = "images/image.png")]
        image: PathBuf,

        /// Display name of the console player
        #[arg(long, default_value = "player")]
        player: String,
    },

    /// Answer `!ping` and `!skribbl` commands typed on stdin
    Serve {
        /// Display name of the console player
        #[arg(long, default_value = "player")]
        player: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> SkribblResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Commands::Play {
            duration,
            reveal_fraction,
            word,
            image,
            player,
        } => {
            let words: Box<dyn WordSource> = match word {
                Some(word) => Box::new(StaticWordSource::new(WordCard::new(image, word))),
                None => Box::new(CatalogWordSource::from_entries(&config.words)?),
            };
            play_round(&config, words.as_ref(), duration, reveal_fraction, &player, &mut rng).await
        }
        Commands::Serve { player } => {
            let words = CatalogWordSource::from_entries(&config.words)?;
            serve(&config, &words, &player, &mut rng).await;
            Ok(())
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn play_round(
    config: &SkribblConfig,
    words: &dyn WordSource,
    duration: Option<u32>,
    reveal_fraction: Option<f64>,
    player: &str,
    rng: &mut StdRng,
) -> SkribblResult<()> {
    let transport = Arc::new(ConsoleTransport::new(&config.bot.name, User::new(1, player)));
    let reader = transport.spawn_stdin_reader();

    let settings = config.game_settings(duration.map(f64::from), reveal_fraction)?;
    let engine = RevealGameEngine::new(config.engine.clone());
    let report = engine
        .start_game(&settings, CONSOLE_CHANNEL, words, transport.as_ref(), rng)
        .await?;

    info!(
        result = %report.result,
        reveals = report.reveals,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Round complete"
    );

    reader.abort();
    Ok(())
}

async fn serve(config: &SkribblConfig, words: &CatalogWordSource, player: &str, rng: &mut StdRng) {
    let transport = Arc::new(ConsoleTransport::new(&config.bot.name, User::new(1, player)));
    let reader = transport.spawn_stdin_reader();

    println!(
        "Type {prefix}skribbl [seconds] [fraction] to start a round, {prefix}ping to check the bot. Ctrl-D quits.",
        prefix = config.bot.command_prefix
    );

    let dispatcher = CommandDispatcher::new(config, transport.as_ref(), words);
    let games = dispatcher.run(CONSOLE_CHANNEL, rng).await;
    info!(games, "Console closed");

    let _ = reader.await;
}
