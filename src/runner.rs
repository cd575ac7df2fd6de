//! End-to-end scan jobs: resolve targets, scan them, persist the report.

use crate::error::Result;
use crate::input::load_targets;
use crate::model::{ScanResultSet, ScanTarget};
use crate::output::{write_report, OutputFormat};
use crate::scan::Coordinator;
use std::path::PathBuf;
use tracing::info;

/// Where the targets of a job come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// One URL, probed as given. A malformed URL becomes a failed result.
    Url(String),
    /// A newline-delimited file of URLs; invalid lines are skipped.
    File(PathBuf),
}

impl TargetSource {
    pub fn resolve(&self) -> Result<Vec<ScanTarget>> {
        match self {
            TargetSource::Url(url) => Ok(vec![ScanTarget::unchecked(url.trim())]),
            TargetSource::File(path) => load_targets(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanJob {
    pub source: TargetSource,
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl ScanJob {
    /// Resolves the targets, probes every one of them, then writes the report.
    ///
    /// Nothing is written when the targets cannot be resolved.
    ///
    /// # Errors
    ///
    /// Returns configuration errors from target resolution and
    /// [`ScanError::ReportWrite`](crate::ScanError::ReportWrite) if the report
    /// cannot be written.
    pub async fn run(&self, coordinator: &Coordinator) -> Result<ScanResultSet> {
        match &self.source {
            TargetSource::Url(url) => info!(url = %url, "testing single URL"),
            TargetSource::File(path) => info!(path = %path.display(), "testing URLs from file"),
        }

        let targets = self.source.resolve()?;
        self.run_targets(targets, coordinator).await
    }

    /// Probes already resolved targets and writes the report once all are done.
    pub async fn run_targets(
        &self,
        targets: Vec<ScanTarget>,
        coordinator: &Coordinator,
    ) -> Result<ScanResultSet> {
        let results = coordinator.run(targets).await?;

        write_report(&results, &self.output, self.format)?;
        info!(path = %self.output.display(), "results saved");

        Ok(results)
    }
}
