//! Word list downloads: streamed HTTP GET with bounded retries.
//!
//! A file that already exists is never fetched again. Bodies are streamed into
//! a temp file beside the target and renamed into place once complete, so a
//! failed attempt never leaves a truncated list behind.

use std::{
    io::{Read, Write},
    path::Path,
    thread,
    time::Duration,
};

use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{
    config::{DownloadConfig, WordlistSource},
    error::AppError,
};

/// What [`Fetcher::ensure`] did for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was already on disk; no request was made.
    Present,
    Downloaded { bytes: u64, attempts: u32 },
}

/// Blocking downloader. The HTTP client is built once and reused for every
/// source.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    settings: DownloadConfig,
}

impl Fetcher {
    pub fn new(settings: &DownloadConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed building HTTP client: {e}")))?;
        Ok(Self { client, settings: settings.clone() })
    }

    /// Make sure `dir/source.filename` exists, downloading it if absent.
    /// Download progress and retry notices are written to `out`.
    pub fn ensure<W: Write + ?Sized>(
        &self,
        dir: &Path,
        source: &WordlistSource,
        out: &mut W,
    ) -> Result<FetchOutcome, AppError> {
        let target = dir.join(&source.filename);
        if target.exists() {
            debug!(file = %target.display(), "wordlist already present");
            return Ok(FetchOutcome::Present);
        }
        writeln!(out, "-> Downloading {} from {}...", source.filename, source.url)?;
        let (bytes, attempts) = self.download(&source.url, &target, out)?;
        Ok(FetchOutcome::Downloaded { bytes, attempts })
    }

    /// Download `url` to `target`, trying up to `max_attempts` times.
    ///
    /// Returns the number of bytes written and the attempt that succeeded.
    pub fn download<W: Write + ?Sized>(
        &self,
        url: &str,
        target: &Path,
        out: &mut W,
    ) -> Result<(u64, u32), AppError> {
        let max = self.settings.max_attempts;
        let file = display_name(target);
        let mut last_error = String::new();

        for attempt in 0..max {
            match self.attempt(url, target) {
                Ok(bytes) => {
                    info!(%file, bytes, attempt = attempt + 1, "download complete");
                    return Ok((bytes, attempt + 1));
                }
                Err(reason) => {
                    warn!(%file, attempt = attempt + 1, max, %reason, "download attempt failed");
                    writeln!(
                        out,
                        "Error downloading {file} (Attempt {}/{max}): {reason}",
                        attempt + 1
                    )?;
                    last_error = reason;
                }
            }
            if attempt + 1 < max {
                let delay = backoff_delay(self.settings.backoff_base, attempt);
                writeln!(out, "Retrying in {} seconds...", delay.as_secs_f64())?;
                thread::sleep(delay);
            }
        }

        Err(AppError::Download { file, attempts: max, reason: last_error })
    }

    fn attempt(&self, url: &str, target: &Path) -> Result<u64, String> {
        let mut response = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| format!("cannot create temp file in {}: {e}", dir.display()))?;

        let mut chunk = vec![0u8; self.settings.chunk_size];
        let mut written: u64 = 0;
        loop {
            let n = response.read(&mut chunk).map_err(|e| format!("body read failed: {e}"))?;
            if n == 0 {
                break;
            }
            tmp.write_all(&chunk[..n]).map_err(|e| format!("write failed: {e}"))?;
            written += n as u64;
        }
        tmp.flush().map_err(|e| format!("write failed: {e}"))?;

        // Temp files start out 0600; cached lists are meant to be shared.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| format!("cannot set permissions: {e}"))?;
        }
        tmp.persist(target)
            .map_err(|e| format!("cannot move download into place: {}", e.error))?;
        Ok(written)
    }
}

/// Wait before retry number `attempt + 1`: `base * 2^attempt`, saturating.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
