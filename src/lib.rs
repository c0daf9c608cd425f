//! dgscribe - batch speech-to-text for audio and video collections
//!
//! Transcribes every matching file through a remote service, caches the
//! responses, writes subtitles and charts next to the sources and ranks the
//! files by speaking rate.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod render;
pub mod stt;

// Collaborator seams
pub use media::converter::{FfmpegConverter, MediaConverter, MockConverter};
pub use stt::service::{MockTranscriptionService, TranscriptionOptions, TranscriptionService};

// Pipeline
pub use pipeline::{
    BatchReport, FileProcessor, FileResult, JobResult, ProcessFile, WorkerPool, run_batch,
};

// Error handling
pub use error::{DgscribeError, Result};

// Config
pub use config::Config;
