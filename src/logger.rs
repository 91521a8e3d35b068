//! Diagnostics go to stderr through `tracing`; stdout stays reserved for
//! progress lines and the passphrase.
//!
//! The configured level is the floor for every target. Per-module directives
//! from `RUST_LOG` (for example `passgen::fetcher=debug`) are layered on top.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Directive, EnvFilter};

use crate::error::AppError;

/// Install the global subscriber. Fails if `level` or `RUST_LOG` is malformed,
/// or if a subscriber is already set.
pub fn init(level: &str) -> Result<(), AppError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, directives.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Combine the configured level with optional extra directives.
pub fn build_filter(level: &str, directives: Option<&str>) -> Result<EnvFilter, AppError> {
    let floor: Directive = parse_level(level)?.into();
    EnvFilter::builder()
        .with_default_directive(floor)
        .parse(directives.unwrap_or_default())
        .map_err(|e| AppError::Logger(format!("bad {} directives: {e}", EnvFilter::DEFAULT_ENV)))
}

/// Check a level name (`off`, `error` … `trace`, any case).
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    match level.trim() {
        "" => Err(AppError::Logger("log level must not be empty".into())),
        name => name
            .parse::<LevelFilter>()
            .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_accepted() {
        for l in ["off", "error", "warn", "info", "debug", "trace", "DEBUG"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn junk_levels_rejected() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
        assert!(parse_level("  ").is_err());
    }

    #[test]
    fn floor_comes_from_level() {
        let filter = build_filter("info", None).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn directives_raise_individual_targets() {
        let filter = build_filter("warn", Some("passgen::fetcher=trace")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn malformed_inputs_error() {
        assert!(build_filter("loud", None).is_err());
        assert!(build_filter("warn", Some("passgen=shouty")).is_err());
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        // Tests share a process, so the first caller may be someone else.
        let _ = init("warn");
        match init("warn") {
            Err(AppError::Logger(msg)) => assert!(msg.contains("set subscriber"), "{msg}"),
            other => panic!("expected subscriber error, got {other:?}"),
        }
    }
}
