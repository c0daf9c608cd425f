//! Aggregation of worker outcomes into the batch summary.

use crate::error::{DgscribeError, Result};
use crate::pipeline::types::{FileResult, JobResult};
use crossbeam_channel::Receiver;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful files, fastest speakers first.
    pub results: Vec<FileResult>,
    /// Failed files in arrival order.
    pub failures: Vec<(String, DgscribeError)>,
}

impl BatchReport {
    /// Drains `results` until every worker is done.
    pub fn collect(results: Receiver<JobResult>) -> Self {
        Self::from_outcomes(results.iter())
    }

    pub fn from_outcomes(outcomes: impl IntoIterator<Item = JobResult>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                JobResult::Done(result) => report.results.push(result),
                JobResult::Failed { file, error } => {
                    log::debug!("{file} failed: {error}");
                    report.failures.push((file, error));
                }
            }
        }
        report.sort();
        report
    }

    /// Stable sort by words per minute, descending.
    fn sort(&mut self) {
        self.results.sort_by(|a, b| b.wpm.total_cmp(&a.wpm));
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.failures.is_empty()
    }

    /// Writes the sorted results as a pretty-printed JSON array.
    pub fn write_summary(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.results)?;
        fs::write(path, json + "\n").map_err(|source| DgscribeError::SummaryWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// One line per failure, or an empty string when nothing failed.
    pub fn render_failures(&self) -> String {
        self.failures
            .iter()
            .map(|(file, error)| format!("  - {file} ({error})\n"))
            .collect()
    }
}
