//! Records flowing from the workers to the aggregator.

use crate::error::DgscribeError;
use serde::{Deserialize, Serialize};

/// Speaking rate of one successfully processed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub file: String,
    pub wpm: f64,
}

impl FileResult {
    pub fn new(file: impl Into<String>, wpm: f64) -> Self {
        Self {
            file: file.into(),
            wpm,
        }
    }
}

/// Outcome of one file that went through the per-file pipeline.
///
/// Skipped files never produce one.
#[derive(Debug)]
pub enum JobResult {
    Done(FileResult),
    Failed { file: String, error: DgscribeError },
}

impl JobResult {
    /// The source file this outcome belongs to.
    pub fn file(&self) -> &str {
        match self {
            JobResult::Done(result) => &result.file,
            JobResult::Failed { file, .. } => file,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobResult::Failed { .. })
    }
}
