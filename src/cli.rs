//! Command-line interface definitions for rmrb_harvest.
//!
//! Every flag is optional. With no arguments the run uses the built-in
//! configuration (see [`crate::config::Config`]); a YAML file given with
//! `--config` is applied next, and the remaining flags override both.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for rmrb_harvest.
///
/// # Examples
///
/// ```sh
/// # Fixed configuration: 2023-01-01, 20 articles, rmrb_data.csv
/// rmrb_harvest
///
/// # Another issue, fewer articles, no delay between requests
/// rmrb_harvest --date 2023-03-05 -n 6 --delay-ms 0
///
/// # Settings from a file, plus a JSON benchmark report
/// rmrb_harvest -c harvest.yaml --report bench.json
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Issue date to harvest (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// CSV file the article records are appended to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of article URLs to collect
    #[arg(short = 'n', long)]
    pub target_count: Option<usize>,

    /// Pause after every article request, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Root of the dated page hierarchy
    #[arg(long)]
    pub base_url: Option<String>,

    /// Location of the site's robots.txt
    #[arg(long)]
    pub robots_url: Option<String>,

    /// Write a JSON benchmark report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}
