//! Wordlist passphrase generator.
//!
//! Downloads the configured word lists once, merges them into a deduplicated
//! collection and draws a hyphen-joined passphrase from it.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod merger;
pub mod pipeline;
pub mod resolver;
pub mod sampler;

pub use config::{Config, WordlistSource};
pub use error::AppError;
