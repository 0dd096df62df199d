//! # rmrb_harvest
//!
//! Fetches one day's article pages from the People's Daily digital edition,
//! extracts title, date and body from each, and appends them to a CSV file.
//! The same URL list is fetched twice, once by a single worker and once split
//! between two concurrent workers, and the wall-clock time of each is reported.
//!
//! ## Usage
//!
//! ```sh
//! rmrb_harvest
//! rmrb_harvest --date 2023-03-05 -n 10 --report bench.json
//! RUST_LOG=rmrb_harvest=debug rmrb_harvest
//! ```
//!
//! ## Architecture
//!
//! 1. **Policy**: consult robots.txt; stop only on an explicit refusal
//! 2. **Indexing**: front page → section pages → up to N article URLs
//! 3. **Sequential run**: fetch, extract and append each URL with a pause after each
//! 4. **Split run**: the same, with the list halved across two tasks
//! 5. **Report**: elapsed time per strategy and the speedup

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod robots;
mod scrapers;
mod strategies;
#[cfg(test)]
mod test_support;
mod utils;

use cli::Cli;
use config::Config;
use fetcher::HttpFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("rmrb_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = Config::load(&args)?;
    let fetcher = Arc::new(HttpFetcher::new(&config)?);

    match pipeline::run(&config, fetcher).await {
        Ok(report) => info!(
            urls = report.urls.len(),
            output = %report.output_file,
            "Harvest finished"
        ),
        Err(e) => error!(error = %e, "Harvest aborted"),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
