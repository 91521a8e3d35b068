//! Resolver → Fetcher → Merger → Sampler, with progress written to `out`.
//!
//! The first error aborts the run and is returned to the caller untouched.

use std::io::Write;

use rand::Rng;
use tracing::info;

use crate::{
    config::Config,
    error::AppError,
    fetcher::{FetchOutcome, Fetcher},
    merger, resolver, sampler,
};

/// Final product of a run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub passphrase: String,
    pub unique_words: usize,
    pub entropy_bits: f64,
}

/// Run the whole pipeline. `custom_dir` is the optional CLI directory
/// argument; progress lines go to `out`, the passphrase is the last line.
pub fn run<W: Write, R: Rng + ?Sized>(
    config: &Config,
    custom_dir: Option<&str>,
    out: &mut W,
    rng: &mut R,
) -> Result<Generated, AppError> {
    let dir = resolver::resolve(custom_dir, config);
    writeln!(out, "--- Passphrase Generator Setup ---")?;
    writeln!(out, "Wordlist directory set to: {}", dir.display())?;
    resolver::ensure_dir(&dir)?;

    let fetcher = Fetcher::new(&config.download)?;
    let mut all_present = true;
    for source in &config.sources {
        match fetcher.ensure(&dir, source, out)? {
            FetchOutcome::Present => {}
            FetchOutcome::Downloaded { bytes, attempts } => {
                all_present = false;
                writeln!(
                    out,
                    "-> Successfully downloaded {} ({bytes} bytes, attempt {attempts}).",
                    source.filename
                )?;
            }
        }
    }
    if all_present {
        writeln!(out, "\nAll wordlist files are present. Skipping download.")?;
    }

    let merged =
        merger::merge(&dir, &config.sources, config.passphrase.min_unique_words, out, rng)?;
    writeln!(out, "\n--- Wordlist Summary ---")?;
    writeln!(out, "Total unique words in merged list: {}", merged.unique_count())?;
    if merged.below_minimum {
        writeln!(
            out,
            "Warning: merged wordlist has fewer than {} unique words. Entropy is lower than usual.",
            config.passphrase.min_unique_words
        )?;
    }

    let words = config.passphrase.words;
    let passphrase =
        sampler::generate(&merged.words, words, &config.passphrase.separator, rng)?;
    let entropy_bits = sampler::entropy_bits(merged.unique_count(), words);
    info!(words, unique = merged.unique_count(), entropy_bits, "passphrase generated");

    writeln!(out, "\n==========================================")?;
    writeln!(
        out,
        "About {entropy_bits:.1} bits of entropy ({words} words drawn from {} with replacement).",
        merged.unique_count()
    )?;
    writeln!(out, "Your {words}-word passphrase:")?;
    writeln!(out, "{passphrase}")?;

    Ok(Generated { passphrase, unique_words: merged.unique_count(), entropy_bits })
}
