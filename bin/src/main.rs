//! aqstream CLI - Streams daily OpenAQ measurements into a batching sink.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "aqstream")]
#[command(about = "Stream daily OpenAQ air-quality measurements", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and logs below error)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch each day of a date range and publish its records
    Stream(StreamArgs),

    /// Inspect the per-date cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Arguments for the `stream` command.
#[derive(Args)]
pub(crate) struct StreamArgs {
    /// First day to stream (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub(crate) start_date: Option<NaiveDate>,

    /// Last day to stream, inclusive (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub(crate) end_date: Option<NaiveDate>,

    /// Seconds to wait between consecutive days
    #[arg(long, default_value = "10")]
    pub(crate) pull_frequency: u64,

    /// Serve days from the cache when an entry exists
    #[arg(long)]
    pub(crate) use_cache: bool,

    /// Messages in a batch before it is written
    #[arg(long, default_value = "1000")]
    pub(crate) batch_max_messages: usize,

    /// Bytes in a batch before it is written
    #[arg(long, default_value = "1024")]
    pub(crate) batch_max_bytes: usize,

    /// Seconds the first message of a batch may wait before it is written
    #[arg(long, default_value = "10")]
    pub(crate) batch_max_latency: u64,

    /// Output file for published records. Defaults to stdout; `-` also means stdout.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Cache directory. Defaults to the platform data directory.
    #[arg(long)]
    pub(crate) cache_dir: Option<PathBuf>,

    /// Measurements endpoint URL
    #[arg(long)]
    pub(crate) endpoint: Option<String>,

    /// Records requested per page (at most 10000)
    #[arg(long)]
    pub(crate) page_size: Option<u32>,

    /// Retries per page on transient failures
    #[arg(long)]
    pub(crate) max_retries: Option<u32>,
}

/// Actions for inspecting the cache.
#[derive(Subcommand)]
enum CacheAction {
    /// List cached dates with their record counts
    List {
        /// Cache directory. Defaults to the platform data directory.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Print the cached records of one day as newline-delimited JSON
    Show {
        /// Day to print (YYYY-MM-DD)
        date: NaiveDate,

        /// Cache directory. Defaults to the platform data directory.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    display::init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Stream(args) => commands::stream::stream(args, cli.quiet).await,
        Commands::Cache { action } => match action {
            CacheAction::List { cache_dir } => commands::cache::list_cached(cache_dir),
            CacheAction::Show { date, cache_dir } => commands::cache::show_cached(date, cache_dir),
        },
    }
}
