//! JSON benchmark report.
//!
//! When a report path is configured, the finished [`BenchmarkReport`] is
//! written there as pretty-printed JSON, creating parent directories as
//! needed. The CSV file remains the primary output; a failed report write is
//! logged by the caller and does not undo the run.

use crate::error::Result;
use crate::models::BenchmarkReport;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &BenchmarkReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;
    info!(urls = report.urls.len(), "Wrote benchmark report");
    Ok(())
}
