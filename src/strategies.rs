//! Execution strategies for the fetch → extract → store loop.
//!
//! Both strategies work through the same URL list with the same per-URL
//! sequence and the same pause after every URL:
//!
//! - **Sequential**: one worker, list order
//! - **Split in two**: the list is cut into two contiguous halves and each
//!   half gets its own worker task; the strategy ends when both have joined
//!
//! A URL that cannot be fetched or stored is logged and counted; it never
//! stops a worker. The only state the workers share is the [`RecordStore`].

use crate::fetcher::PageFetcher;
use crate::models::{StrategyKind, StrategyReport};
use crate::outputs::records::RecordStore;
use crate::scrapers::article::ArticleSelectors;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::spawn_blocking;
use tokio::time::{sleep, Instant};
use tracing::{error, info, instrument, warn};

/// What every worker needs, cheap to clone into a task.
#[derive(Clone)]
pub struct WorkerContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub store: Arc<RecordStore>,
    pub selectors: Arc<ArticleSelectors>,
    /// Pause after every URL, successful or not.
    pub delay: Duration,
}

/// Per-worker counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTally {
    pub attempted: usize,
    pub stored: usize,
    pub failed: usize,
}

impl WorkerTally {
    fn absorb(&mut self, other: WorkerTally) {
        self.attempted += other.attempted;
        self.stored += other.stored;
        self.failed += other.failed;
    }
}

/// Cut `urls` into two contiguous halves; the first has `len / 2` entries.
pub fn split_in_two(urls: &[String]) -> (&[String], &[String]) {
    urls.split_at(urls.len() / 2)
}

/// Fetch, extract and store each URL in order, pausing after each one.
///
/// The CSV append is blocking file I/O, so it runs on the blocking pool and
/// the other worker keeps its thread while a row is written.
#[instrument(level = "info", skip_all, fields(worker = %label, urls = urls.len()))]
pub async fn run_worker(label: &str, urls: &[String], ctx: &WorkerContext) -> WorkerTally {
    let mut tally = WorkerTally::default();
    let total = urls.len();

    for (i, url) in urls.iter().enumerate() {
        info!("{label} progress: {}/{total} - {url}", i + 1);
        tally.attempted += 1;

        match ctx.fetcher.fetch(url).await {
            Some(html) => {
                let record = ctx.selectors.extract_article(url, &html);
                let store = Arc::clone(&ctx.store);
                match spawn_blocking(move || store.append(&record)).await {
                    Ok(Ok(())) => tally.stored += 1,
                    Ok(Err(e)) => {
                        error!(%url, error = %e, "Could not store record");
                        tally.failed += 1;
                    }
                    Err(e) => {
                        error!(%url, error = %e, "Store task did not finish");
                        tally.failed += 1;
                    }
                }
            }
            None => tally.failed += 1,
        }

        sleep(ctx.delay).await;
    }
    tally
}

/// Run one worker task per partition, all at the same time, and join them.
///
/// # Arguments
///
/// * `partitions` - URL lists, one per worker; workers are labelled `worker 1`, `worker 2`, ...
/// * `ctx` - Shared fetcher, store, selectors and delay, cloned into each task
///
/// # Returns
///
/// The summed tallies. A worker that panics is logged and its whole
/// partition is counted as attempted and failed.
pub async fn run_partitioned(partitions: Vec<Vec<String>>, ctx: &WorkerContext) -> WorkerTally {
    let handles: Vec<_> = partitions
        .into_iter()
        .enumerate()
        .map(|(i, urls)| {
            let ctx = ctx.clone();
            let len = urls.len();
            let handle = tokio::spawn(async move {
                let label = format!("worker {}", i + 1);
                run_worker(&label, &urls, &ctx).await
            });
            (len, handle)
        })
        .collect();

    let (lens, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
    let mut total = WorkerTally::default();
    for (len, joined) in lens.into_iter().zip(join_all(handles).await) {
        match joined {
            Ok(tally) => total.absorb(tally),
            Err(e) => {
                error!(error = %e, urls = len, "Worker task did not finish");
                total.absorb(WorkerTally {
                    attempted: len,
                    stored: 0,
                    failed: len,
                });
            }
        }
    }
    total
}

/// Work through `urls` in list order with a single worker.
///
/// # Arguments
///
/// * `urls` - Article URLs, in discovery order
/// * `ctx` - Fetcher, record store, selectors and per-URL delay
///
/// # Returns
///
/// A [`StrategyReport`] with one worker and the wall-clock time from the
/// first request until the last pause ended.
#[instrument(level = "info", skip_all, fields(urls = urls.len()))]
pub async fn run_sequential(urls: &[String], ctx: &WorkerContext) -> StrategyReport {
    info!("=== Sequential run starting ===");
    let t0 = Instant::now();
    let tally = run_worker("sequential", urls, ctx).await;
    finish(StrategyKind::Sequential, 1, tally, t0)
}

/// Cut `urls` with [`split_in_two`] and run both halves concurrently.
///
/// Each half is processed in its own order; rows from the two workers
/// interleave in the output file. Elapsed time runs until both workers have
/// joined, so with a fixed delay it is set by the larger half.
#[instrument(level = "info", skip_all, fields(urls = urls.len()))]
pub async fn run_split(urls: &[String], ctx: &WorkerContext) -> StrategyReport {
    info!("=== Split-in-two run starting ===");
    let t0 = Instant::now();
    let (first, second) = split_in_two(urls);
    let tally = run_partitioned(vec![first.to_vec(), second.to_vec()], ctx).await;
    finish(StrategyKind::SplitInTwo, 2, tally, t0)
}

fn finish(strategy: StrategyKind, workers: usize, tally: WorkerTally, t0: Instant) -> StrategyReport {
    let elapsed = t0.elapsed();
    if tally.failed > 0 {
        warn!(%strategy, failed = tally.failed, "Some URLs were skipped");
    }
    info!(
        %strategy,
        stored = tally.stored,
        secs = elapsed.as_secs_f64(),
        "Strategy complete"
    );
    StrategyReport {
        strategy,
        workers,
        attempted: tally.attempted,
        stored: tally.stored,
        failed: tally.failed,
        elapsed_ms: elapsed.as_millis() as u64,
    }
}
