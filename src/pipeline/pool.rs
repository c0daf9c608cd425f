//! Fixed-size worker pool.
//!
//! Three kinds of threads cooperate:
//!
//! ```text
//! dispatcher ──jobs──▶ worker × N ──results──▶ caller
//!                          ▲
//!                      supervisor (joins workers, then closes results)
//! ```
//!
//! Both queues are sized to hold the whole batch, so neither the dispatcher
//! nor a worker ever blocks on a full queue. The job queue closes when the
//! dispatcher drops its sender. The result queue closes when the supervisor
//! drops the last result sender, which only happens after every worker has
//! been joined.

use crate::defaults;
use crate::error::DgscribeError;
use crate::media::path::FilePath;
use crate::pipeline::processor::ProcessFile;
use crate::pipeline::types::JobResult;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Observer for batch progress.
pub trait ProgressReporter: Send + Sync {
    /// Called once before any work is dispatched.
    fn begin(&self, total: usize);
    /// Called after each file leaves a worker, skipped files included.
    fn file_done(&self, file: &FilePath);
    /// Called once after every worker has exited.
    fn finish(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn begin(&self, _total: usize) {}
    fn file_done(&self, _file: &FilePath) {}
    fn finish(&self) {}
}

pub struct WorkerPool {
    workers: usize,
    progress: Arc<dyn ProgressReporter>,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(defaults::WORKERS)
    }
}

impl WorkerPool {
    /// Creates a pool with `workers` threads. Zero is raised to one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Starts processing `files` and returns the result stream.
    ///
    /// The receiver yields one [`JobResult`] per file that was not skipped
    /// and disconnects once every worker has finished.
    pub fn run(
        &self,
        processor: Arc<dyn ProcessFile>,
        files: Vec<FilePath>,
    ) -> Receiver<JobResult> {
        let capacity = files.len().max(1);
        let (job_tx, job_rx) = bounded::<FilePath>(capacity);
        let (result_tx, result_rx) = bounded::<JobResult>(capacity);

        self.progress.begin(files.len());
        log::debug!(
            "dispatching {} files to {} workers",
            files.len(),
            self.workers
        );

        thread::spawn(move || dispatch(files, job_tx));

        let workers: Vec<JoinHandle<()>> = (0..self.workers)
            .map(|id| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let processor = processor.clone();
                let progress = self.progress.clone();
                thread::spawn(move || work(id, jobs, results, processor, progress))
            })
            .collect();
        drop(job_rx);

        let progress = self.progress.clone();
        thread::spawn(move || supervise(workers, result_tx, progress));

        result_rx
    }
}

fn dispatch(files: Vec<FilePath>, jobs: Sender<FilePath>) {
    for file in files {
        if jobs.send(file).is_err() {
            // every worker is gone
            break;
        }
    }
}

fn work(
    id: usize,
    jobs: Receiver<FilePath>,
    results: Sender<JobResult>,
    processor: Arc<dyn ProcessFile>,
    progress: Arc<dyn ProgressReporter>,
) {
    while let Ok(file) = jobs.recv() {
        log::debug!("worker {id} picked up {file}");
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| processor.process(&file))) {
            Ok(Ok(Some(result))) => Some(JobResult::Done(result)),
            Ok(Ok(None)) => None,
            Ok(Err(error)) => Some(JobResult::Failed {
                file: file.to_string(),
                error,
            }),
            Err(_) => Some(JobResult::Failed {
                file: file.to_string(),
                error: DgscribeError::Other("processing panicked".to_string()),
            }),
        };
        progress.file_done(&file);

        if let Some(outcome) = outcome
            && results.send(outcome).is_err()
        {
            // nobody is listening any more
            break;
        }
    }
}

fn supervise(
    workers: Vec<JoinHandle<()>>,
    results: Sender<JobResult>,
    progress: Arc<dyn ProgressReporter>,
) {
    for (id, handle) in workers.into_iter().enumerate() {
        if handle.join().is_err() {
            log::error!("worker {id} thread panicked");
        }
    }
    progress.finish();
    drop(results);
}
