//! Data models for harvested articles and benchmark results.
//!
//! - [`ArticleRecord`]: one extracted article page, one CSV row
//! - [`StrategyReport`]: what one execution strategy did and how long it took
//! - [`BenchmarkReport`]: the whole run, optionally written as JSON

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single article page reduced to flat fields.
///
/// The field order here is the column order of the CSV file; the header row
/// is derived from it by the `csv` serializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The page the record was extracted from.
    pub url: String,
    pub title: String,
    /// Publication date exactly as printed on the page.
    pub date: String,
    /// Body paragraphs joined with `\n`.
    pub content: String,
    /// Number of characters (not bytes) in `content`.
    pub content_length: usize,
}

impl ArticleRecord {
    /// Build a record, computing `content_length` from `content`.
    pub fn new(url: impl Into<String>, title: String, date: String, content: String) -> Self {
        let content_length = content.chars().count();
        Self {
            url: url.into(),
            title,
            date,
            content,
            content_length,
        }
    }
}

/// The two ways the URL list is worked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Sequential,
    SplitInTwo,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Sequential => write!(f, "sequential"),
            StrategyKind::SplitInTwo => write!(f, "split-in-two"),
        }
    }
}

/// Outcome of running one strategy over the URL list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyReport {
    pub strategy: StrategyKind,
    pub workers: usize,
    /// URLs handed to the workers.
    pub attempted: usize,
    /// Records appended to the output file.
    pub stored: usize,
    /// URLs that could not be fetched or stored.
    pub failed: usize,
    /// Wall-clock time from first request to the last worker finishing.
    pub elapsed_ms: u64,
}

impl StrategyReport {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}

/// Everything a run produced, in the order it was produced.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchmarkReport {
    pub date: NaiveDate,
    pub output_file: String,
    pub urls: Vec<String>,
    pub sequential: StrategyReport,
    pub split: StrategyReport,
}

impl BenchmarkReport {
    /// Sequential time divided by split time; `None` if the split run took no measurable time.
    pub fn speedup(&self) -> Option<f64> {
        if self.split.elapsed_ms == 0 {
            None
        } else {
            Some(self.sequential.elapsed_ms as f64 / self.split.elapsed_ms as f64)
        }
    }
}
