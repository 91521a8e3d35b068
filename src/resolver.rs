//! Wordlist directory resolution.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{config::{expand_home, Config}, error::AppError};

/// Pick the directory holding the cached word lists.
///
/// A custom path wins over the configured default; both get `~` expansion and
/// nothing else. The directory is not created here, see [`ensure_dir`].
pub fn resolve(custom: Option<&str>, config: &Config) -> PathBuf {
    match custom {
        Some(path) if !path.is_empty() => expand_home(path),
        _ => config.wordlist_dir.clone(),
    }
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    debug!(dir = %dir.display(), "wordlist directory ready");
    Ok(())
}
