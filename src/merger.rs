//! Loading, normalising and merging word lists.
//!
//! Each line is trimmed and lowercased; blank lines are dropped. The combined
//! words are reduced to a set, then materialised once as a shuffled `Vec`.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Write},
    path::Path,
};

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, warn};

use crate::{config::WordlistSource, error::AppError};

/// Word count contributed by one source file, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub key: String,
    pub words: usize,
}

/// Result of [`merge`]: the unique, shuffled collection plus bookkeeping.
#[derive(Debug, Clone)]
pub struct MergedWords {
    pub words: Vec<String>,
    pub per_source: Vec<SourceCount>,
    /// `true` when `words.len()` is under the configured soft minimum.
    pub below_minimum: bool,
}

impl MergedWords {
    pub fn unique_count(&self) -> usize {
        self.words.len()
    }
}

/// Read one word list: trimmed, lowercased, blank lines skipped.
pub fn load_words(path: &Path) -> Result<Vec<String>, AppError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::MissingFile(path.to_path_buf()),
        _ => AppError::Read { path: path.to_path_buf(), reason: e.to_string() },
    })?;

    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| AppError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_lowercase());
        }
    }
    debug!(file = %path.display(), words = words.len(), "wordlist loaded");
    Ok(words)
}

/// Load every source from `dir`, deduplicate across all of them and shuffle
/// the result once with `rng`. Per-file progress goes to `out`.
pub fn merge<W: Write + ?Sized, R: Rng + ?Sized>(
    dir: &Path,
    sources: &[WordlistSource],
    min_unique_words: usize,
    out: &mut W,
    rng: &mut R,
) -> Result<MergedWords, AppError> {
    let mut unique: HashSet<String> = HashSet::new();
    let mut per_source = Vec::with_capacity(sources.len());

    for source in sources {
        writeln!(out, "-> Loading words from {}...", source.filename)?;
        let words = load_words(&dir.join(&source.filename))?;
        writeln!(out, "   Loaded {} {} words.", words.len(), source.key)?;
        info!(source = %source.key, words = words.len(), "loaded words");
        per_source.push(SourceCount { key: source.key.clone(), words: words.len() });
        unique.extend(words);
    }

    let mut words: Vec<String> = unique.into_iter().collect();
    words.shuffle(rng);

    let below_minimum = words.len() < min_unique_words;
    if below_minimum {
        warn!(
            unique = words.len(),
            minimum = min_unique_words,
            "merged wordlist is smaller than expected; entropy will be lower"
        );
    } else {
        info!(unique = words.len(), "merged wordlist ready");
    }

    Ok(MergedWords { words, per_source, below_minimum })
}
