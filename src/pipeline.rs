//! The harvest run, start to finish.
//!
//! 1. Check the crawl policy (advisory; only an explicit refusal stops the run)
//! 2. Index the configured issue date into a bounded article URL list
//! 3. Remove any previous output file, run the sequential strategy
//! 4. Remove the output file again, run the split-in-two strategy
//! 5. Report both timings, optionally as JSON
//!
//! The two strategies are a throughput comparison over the same URL list;
//! the output file left behind is the one written by the second.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::models::BenchmarkReport;
use crate::outputs::{json, records::RecordStore};
use crate::robots::check_policy;
use crate::scrapers::{article::ArticleSelectors, index::Indexer};
use crate::strategies::{run_sequential, run_split, WorkerContext};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Harvest one issue with both strategies and report how long each took.
///
/// # Arguments
///
/// * `config` - Issue date, URLs, selectors, output file and delays
/// * `fetcher` - Shared by the policy check, discovery and every worker
///
/// # Returns
///
/// The [`BenchmarkReport`] for the run. It is also written to
/// `config.report_file` when one is set; a failure there is only logged.
///
/// # Errors
///
/// * [`Error::Selector`], [`Error::InvalidUrl`], [`Error::DateFormat`] - bad
///   configuration, reported before any request is made
/// * [`Error::PolicyDisallows`] - the crawl policy refuses the site
/// * [`Error::EmptyDiscovery`] - no article URLs were found; the previous
///   output file is left alone
/// * [`Error::Io`] - the previous output file could not be removed
#[instrument(level = "info", skip_all, fields(date = %config.date))]
pub async fn run(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<BenchmarkReport> {
    // Bad selectors or a bad base URL should fail before any request is made.
    let indexer = Indexer::new(config)?;
    let selectors = Arc::new(ArticleSelectors::new(&config.selectors)?);

    let verdict = check_policy(fetcher.as_ref(), config).await;
    if !verdict.permits() {
        return Err(Error::PolicyDisallows(config.base_url.clone()));
    }

    info!(front_page = indexer.front_page_url(), "Preparing to harvest issue of {}", config.date);
    let urls = indexer.index_articles(fetcher.as_ref()).await;
    if urls.is_empty() {
        return Err(Error::EmptyDiscovery(config.date));
    }

    info!(count = urls.len(), "Article URLs to fetch:");
    for (i, url) in urls.iter().enumerate() {
        info!("{}. {url}", i + 1);
    }

    let store = Arc::new(RecordStore::new(&config.output_file));
    let ctx = WorkerContext {
        fetcher,
        store: Arc::clone(&store),
        selectors,
        delay: config.request_delay(),
    };

    store.clear()?;
    let sequential = run_sequential(&urls, &ctx).await;

    store.clear()?;
    let split = run_split(&urls, &ctx).await;

    let report = BenchmarkReport {
        date: config.date,
        output_file: store.path().display().to_string(),
        urls,
        sequential,
        split,
    };
    log_comparison(&report);

    if let Some(path) = &config.report_file {
        if let Err(e) = json::write_report(&report, path).await {
            error!(path = %path.display(), error = %e, "Failed to write benchmark report");
        }
    }

    info!("=== All tasks complete ===");
    Ok(report)
}

fn log_comparison(report: &BenchmarkReport) {
    for strategy in [&report.sequential, &report.split] {
        info!(
            workers = strategy.workers,
            stored = strategy.stored,
            failed = strategy.failed,
            "{} finished in {:.2}s",
            strategy.strategy,
            strategy.elapsed_secs()
        );
    }
    match report.speedup() {
        Some(ratio) => info!("Split-in-two speedup over sequential: {ratio:.2}x"),
        None => info!("Split-in-two finished too quickly to compare"),
    }
}
