//! One full batch: pool run, aggregation, summary write.

use crate::error::Result;
use crate::media::path::FilePath;
use crate::pipeline::pool::WorkerPool;
use crate::pipeline::processor::ProcessFile;
use crate::pipeline::report::BatchReport;
use std::path::Path;
use std::sync::Arc;

/// Processes `files` on `pool` and writes the sorted summary to `summary`.
///
/// Per-file failures end up in the returned report. Only a failed summary
/// write is an error.
pub fn run_batch(
    pool: &WorkerPool,
    processor: Arc<dyn ProcessFile>,
    files: Vec<FilePath>,
    summary: &Path,
) -> Result<BatchReport> {
    let total = files.len();
    let report = BatchReport::collect(pool.run(processor, files));
    log::info!(
        "{total} files: {} transcribed, {} failed",
        report.results.len(),
        report.failures.len()
    );

    report.write_summary(summary)?;
    log::info!("summary written to {}", summary.display());
    Ok(report)
}
