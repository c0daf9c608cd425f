//! Batch pipeline: per-file processing, the worker pool and aggregation.

pub mod batch;
pub mod pool;
pub mod processor;
pub mod report;
pub mod types;

pub use batch::run_batch;
pub use pool::{NoopProgress, ProgressReporter, WorkerPool};
pub use processor::{FileProcessor, ProcessFile};
pub use report::BatchReport;
pub use types::{FileResult, JobResult};
