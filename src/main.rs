//! passgen entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse the command line
//!   3. Load config
//!   4. Init logger at the configured level
//!   5. Fetch, merge, sample and print the passphrase

use clap::Parser;
use tracing::debug;

use passgen::{config, error::AppError, logger, pipeline};

/// Generate a random passphrase from large, locally cached word lists.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory for the cached word lists (default: ~/wordlists).
    #[arg(value_name = "WORDLIST_DIR")]
    wordlist_dir: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present; ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = config::load()?;
    logger::init(&config.log_level)?;

    debug!(
        wordlist_dir = %config.wordlist_dir.display(),
        sources = config.sources.len(),
        words = config.passphrase.words,
        "config loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut rng = rand::thread_rng();
    pipeline::run(&config, cli.wordlist_dir.as_deref(), &mut out, &mut rng)?;

    Ok(())
}
