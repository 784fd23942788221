//! Cache inspection commands.

use crate::display::open_cache;
use anyhow::{Context, Result};
use aqstream_lib::CacheError;
use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;

/// Lists every cached date with its record count.
pub(crate) fn list_cached(cache_dir: Option<PathBuf>) -> Result<()> {
    let cache = open_cache(cache_dir)?;
    let dates = cache.list_dates().context("Failed to list cache entries")?;

    if dates.is_empty() {
        println!("No cached dates in {}.", cache.root().display());
        return Ok(());
    }

    println!("{:<12} {:>10}", "DATE", "RECORDS");
    println!("{}", "-".repeat(23));

    for date in &dates {
        let label = date.to_string();
        match cache.read_all(*date) {
            Ok(records) => println!("{label:<12} {:>10}", records.len()),
            Err(e) => println!("{label:<12} {:>10}  ({e})", "?"),
        }
    }

    println!("\nTotal: {} dates", dates.len());
    Ok(())
}

/// Prints the cached records of one day, one JSON object per line.
pub(crate) fn show_cached(date: NaiveDate, cache_dir: Option<PathBuf>) -> Result<()> {
    let cache = open_cache(cache_dir)?;
    let records = match cache.read_all(date) {
        Ok(records) => records,
        Err(CacheError::Miss(_)) => anyhow::bail!("No cached records for {date}"),
        Err(e) => return Err(e).context(format!("Failed to read cache entry for {date}")),
    };

    let mut out = std::io::stdout().lock();
    for record in &records {
        writeln!(out, "{}", record.to_compact_json())?;
    }
    out.flush()?;
    Ok(())
}
