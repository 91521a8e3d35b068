//! Configuration loading with env-var overrides.
//!
//! Starts from built-in defaults, overlays `config/default.toml` (or the file
//! named by `PASSGEN_CONFIG`) when present, then applies the
//! `PASSGEN_WORDLIST_DIR` and `PASSGEN_LOG_LEVEL` env overrides.

use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{error::AppError, logger};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// One downloadable word list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordlistSource {
    /// Short label used in progress output (e.g. `"english"`).
    pub key: String,
    /// File name inside the wordlist directory.
    pub filename: String,
    pub url: String,
}

/// Retry and transfer settings for the fetcher.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Total attempts per file, including the first.
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles after every failure.
    pub backoff_base: Duration,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Write buffer size used while streaming the body to disk.
    pub chunk_size: usize,
}

/// Sampling settings.
#[derive(Debug, Clone)]
pub struct PassphraseConfig {
    pub words: usize,
    pub separator: String,
    /// Below this many unique words the merger logs an entropy warning.
    pub min_unique_words: usize,
}

/// Fully-resolved configuration. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default wordlist directory (already expanded, no `~`).
    pub wordlist_dir: PathBuf,
    pub log_level: String,
    pub sources: Vec<WordlistSource>,
    pub download: DownloadConfig,
    pub passphrase: PassphraseConfig,
}

impl Config {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.passphrase.words == 0 {
            return Err(AppError::Config("passphrase.words must be at least 1".into()));
        }
        if self.download.max_attempts == 0 {
            return Err(AppError::Config("download.max_attempts must be at least 1".into()));
        }
        if self.download.chunk_size == 0 {
            return Err(AppError::Config("download.chunk_size must be at least 1".into()));
        }
        if self.sources.is_empty() {
            return Err(AppError::Config("at least one [[sources]] entry is required".into()));
        }

        let mut keys = HashSet::new();
        let mut filenames = HashSet::new();
        for source in &self.sources {
            if source.filename.is_empty()
                || source.filename.contains(['/', '\\'])
                || source.filename == "."
                || source.filename == ".."
            {
                return Err(AppError::Config(format!(
                    "source '{}' has an invalid filename '{}'",
                    source.key, source.filename
                )));
            }
            if !keys.insert(source.key.as_str()) {
                return Err(AppError::Config(format!("duplicate source key '{}'", source.key)));
            }
            if !filenames.insert(source.filename.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate source filename '{}'",
                    source.filename
                )));
            }
        }

        logger::parse_level(&self.log_level)
            .map_err(|e| AppError::Config(format!("log.level: {e}")))?;
        Ok(())
    }
}

/// Raw TOML shape, the `serde` target before resolution. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    passphrase: RawPassphrase,
    #[serde(default)]
    download: RawDownload,
    #[serde(default)]
    storage: RawStorage,
    #[serde(default)]
    log: RawLog,
    /// Replaces the built-in sources when non-empty.
    #[serde(default)]
    sources: Vec<WordlistSource>,
}

#[derive(Deserialize)]
struct RawPassphrase {
    #[serde(default = "default_words")]
    words: usize,
    #[serde(default = "default_separator")]
    separator: String,
    #[serde(default = "default_min_unique_words")]
    min_unique_words: usize,
}

impl Default for RawPassphrase {
    fn default() -> Self {
        Self {
            words: default_words(),
            separator: default_separator(),
            min_unique_words: default_min_unique_words(),
        }
    }
}

#[derive(Deserialize)]
struct RawDownload {
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    backoff_base_ms: u64,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_chunk_size")]
    chunk_size: usize,
}

impl Default for RawDownload {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            timeout_secs: default_timeout_secs(),
            chunk_size: default_chunk_size(),
        }
    }
}

#[derive(Deserialize)]
struct RawStorage {
    #[serde(default = "default_wordlist_dir")]
    wordlist_dir: String,
}

impl Default for RawStorage {
    fn default() -> Self {
        Self { wordlist_dir: default_wordlist_dir() }
    }
}

#[derive(Deserialize)]
struct RawLog {
    #[serde(default = "default_log_level")]
    level: String,
}

impl Default for RawLog {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_words() -> usize { 5 }
fn default_separator() -> String { "-".to_string() }
fn default_min_unique_words() -> usize { 1_000_000 }
fn default_max_attempts() -> u32 { 3 }
fn default_backoff_base_ms() -> u64 { 1_000 }
fn default_timeout_secs() -> u64 { 10 }
fn default_chunk_size() -> usize { 8 * 1024 }
fn default_wordlist_dir() -> String { "~/wordlists".to_string() }
fn default_log_level() -> String { "warn".to_string() }

fn default_sources() -> Vec<WordlistSource> {
    vec![
        WordlistSource {
            key: "english".into(),
            filename: "words_alpha.txt".into(),
            url: "https://raw.githubusercontent.com/dwyl/english-words/master/words_alpha.txt".into(),
        },
        WordlistSource {
            key: "italian".into(),
            filename: "660000_parole_italiane.txt".into(),
            url: "https://raw.githubusercontent.com/napolux/paroleitaliane/refs/heads/main/paroleitaliane/660000_parole_italiane.txt".into(),
        },
    ]
}

/// Load config from `PASSGEN_CONFIG` or `config/default.toml` (both optional),
/// then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let explicit = env::var("PASSGEN_CONFIG").ok().map(PathBuf::from);
    let path = match explicit {
        Some(p) => Some(p),
        None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.is_file()),
    };
    let wordlist_dir_override = env::var("PASSGEN_WORDLIST_DIR").ok();
    let log_level_override = env::var("PASSGEN_LOG_LEVEL").ok();
    load_from(
        path.as_deref(),
        wordlist_dir_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader. Accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: Option<&Path>,
    wordlist_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let parsed = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
            toml::from_str::<RawConfig>(&raw)
                .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?
        }
        None => RawConfig::default(),
    };

    // An override set to the empty string counts as unset.
    let wordlist_dir = wordlist_dir_override
        .filter(|d| !d.is_empty())
        .unwrap_or(&parsed.storage.wordlist_dir);
    let log_level = log_level_override
        .filter(|l| !l.is_empty())
        .unwrap_or(&parsed.log.level)
        .to_string();
    let sources = if parsed.sources.is_empty() {
        default_sources()
    } else {
        parsed.sources
    };

    let config = Config {
        wordlist_dir: expand_home(wordlist_dir),
        log_level,
        sources,
        download: DownloadConfig {
            max_attempts: parsed.download.max_attempts,
            backoff_base: Duration::from_millis(parsed.download.backoff_base_ms),
            timeout: Duration::from_secs(parsed.download.timeout_secs),
            chunk_size: parsed.download.chunk_size,
        },
        passphrase: PassphraseConfig {
            words: parsed.passphrase.words,
            separator: parsed.passphrase.separator,
            min_unique_words: parsed.passphrase.min_unique_words,
        },
    };
    config.validate()?;
    Ok(config)
}

/// Resolve a `~` or `~/…` prefix against the home directory. `~user` forms
/// and paths without the prefix come back as given, as does everything when
/// no home directory is known.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => None,
        Some(tail) if tail.starts_with('/') => Some(tail.trim_start_matches('/')),
        _ => return PathBuf::from(path),
    };
    match (dirs::home_dir(), rest) {
        (Some(home), None) => home,
        (Some(home), Some(tail)) => home.join(tail),
        (None, _) => PathBuf::from(path),
    }
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Fast, offline-friendly `Config` for tests: sources point at `base_url`,
/// backoff is a millisecond.
#[cfg(test)]
impl Config {
    pub fn test_default(wordlist_dir: &Path, base_url: &str) -> Self {
        Self {
            wordlist_dir: wordlist_dir.to_path_buf(),
            log_level: "warn".into(),
            sources: vec![
                WordlistSource {
                    key: "first".into(),
                    filename: "first.txt".into(),
                    url: format!("{base_url}/first.txt"),
                },
                WordlistSource {
                    key: "second".into(),
                    filename: "second.txt".into(),
                    url: format!("{base_url}/second.txt"),
                },
            ],
            download: DownloadConfig {
                max_attempts: 3,
                backoff_base: Duration::from_millis(1),
                timeout: Duration::from_secs(2),
                chunk_size: 16,
            },
            passphrase: PassphraseConfig {
                words: 5,
                separator: "-".into(),
                min_unique_words: 1_000_000,
            },
        }
    }
}
