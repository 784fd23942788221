//! Logging and progress display for the aqstream CLI.

use anyhow::Result;
use aqstream_lib::CacheStore;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::PathBuf;

/// Initializes the logger.
///
/// `RUST_LOG` takes precedence when set; otherwise the level follows the
/// `-v` count, starting at `warn`.
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(level),
    };
    // A logger installed earlier keeps working.
    let _ = builder.try_init();
}

/// Creates the per-day progress bar, hidden in quiet mode.
pub(crate) fn day_progress(total_days: u64, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total_days);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}",
            )?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Opens the cache at `dir`, or at the platform default location.
pub(crate) fn open_cache(dir: Option<PathBuf>) -> Result<CacheStore> {
    let cache = match dir {
        Some(dir) => CacheStore::new(dir)?,
        None => CacheStore::with_default_path()?,
    };
    log::debug!("Using cache at {}", cache.root().display());
    Ok(cache)
}
