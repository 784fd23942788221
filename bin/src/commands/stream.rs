//! Stream command implementation.
//!
//! Walks the requested days, fetching or reusing each one, and publishes
//! every record as a line of JSON to a file or stdout.

use crate::StreamArgs;
use crate::display::{day_progress, open_cache};
use anyhow::{Context, Result};
use aqstream_lib::prelude::*;
use futures::StreamExt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Streams every day of the requested range into the output.
pub(crate) async fn stream(args: StreamArgs, quiet: bool) -> Result<()> {
    // Configuration problems abort before anything is fetched.
    let today = chrono::Utc::now().date_naive();
    let start = args.start_date.unwrap_or(today);
    let end = args.end_date.unwrap_or(today);
    let range = DateRange::new(start, end)?;

    let settings = BatchSettings {
        max_messages: args.batch_max_messages,
        max_bytes: args.batch_max_bytes,
        max_latency: Duration::from_secs(args.batch_max_latency),
    };
    settings.validate()?;

    let mut config = ClientConfig::default();
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    let client = FetchClient::new(config).context("Failed to create HTTP client")?;
    let cache = open_cache(args.cache_dir).context("Failed to open cache")?;

    let writer: Box<dyn Write + Send> = match &args.output {
        Some(path) if path != Path::new("-") => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let publisher = NdjsonPublisher::new(writer, settings)?;

    let run_config = RunConfig {
        use_cache: args.use_cache,
        pull_frequency: Duration::from_secs(args.pull_frequency),
    };
    let orchestrator = DailyOrchestrator::new(client, cache, run_config);

    let progress = day_progress(range.total_days() as u64, quiet)?;
    progress.set_message(format!("{start} -> {end}"));

    let days = orchestrator.run(range).inspect(|day| {
        progress.inc(1);
        progress.set_message(day.date.to_string());
    });
    let summary = publish_daily(days, &publisher).await;
    publisher
        .close()
        .await
        .context("Failed to write final batch")?;

    let finish_msg = if summary.truncated_days > 0 {
        format!(
            "Published {} records over {} days ({} days incomplete)",
            summary.records, summary.days, summary.truncated_days
        )
    } else {
        format!("Published {} records over {} days", summary.records, summary.days)
    };
    progress.finish_with_message(finish_msg);

    if summary.publish_failures > 0 {
        log::error!("{} records could not be published", summary.publish_failures);
    }

    Ok(())
}
