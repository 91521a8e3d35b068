//! Application-wide error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("failed to download {file} after {attempts} attempts: {reason}")]
    Download {
        file: String,
        attempts: u32,
        reason: String,
    },

    #[error("wordlist file not found at {}; the download step should have created it", .0.display())]
    MissingFile(PathBuf),

    #[error("cannot read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("not enough words to choose {requested}: collection has {available}")]
    InsufficientWords { requested: usize, available: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
