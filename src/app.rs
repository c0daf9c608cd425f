//! Batch transcription entry points.
//!
//! Wires the pieces together for the binary:
//! discover → pool(fetch → chart → subtitles → rate) → summary

use crate::cli::TranscribeArgs;
use crate::config::Config;
use crate::error::{DgscribeError, Result};
use crate::media::converter::FfmpegConverter;
use crate::media::discover::{discover, files_from_globs};
use crate::media::path::FilePath;
use crate::pipeline::batch::run_batch;
use crate::pipeline::pool::{ProgressReporter, WorkerPool};
use crate::pipeline::processor::FileProcessor;
use crate::pipeline::report::BatchReport;
use crate::render::srt::write_captions;
use crate::stt::cache::TranscriptFetcher;
use crate::stt::deepgram::DeepgramClient;
use crate::stt::service::TranscriptionOptions;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::Arc;

/// Default log filter for the given flags. `RUST_LOG` still wins.
pub fn default_level(quiet: bool, verbosity: u8, progress: bool) -> LevelFilter {
    match (quiet, verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) if progress => LevelFilter::Warn,
        (false, 0) | (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Whether to draw a progress bar instead of per-file log lines.
pub fn show_progress(quiet: bool, verbosity: u8) -> bool {
    !quiet && verbosity == 0 && std::io::stderr().is_terminal()
}

pub fn init_logging(quiet: bool, verbosity: u8, progress: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(quiet, verbosity, progress))
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env();
    if let Err(e) = builder.try_init() {
        eprintln!("Failed to initialise logging: {e}");
    }
}

/// Progress bar ticking once per finished file.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn begin(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn file_done(&self, file: &FilePath) {
        self.bar.set_message(file.name());
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Folds CLI flags into the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &TranscribeArgs) {
    if let Some(workers) = args.workers {
        config.pipeline.workers = usize::from(workers);
    }
    if let Some(model) = &args.model {
        config.transcription.model = model.clone();
    }
    if let Some(language) = &args.language {
        config.transcription.language = language.clone();
    }
    if let Some(summary) = &args.summary {
        config.pipeline.summary = summary.clone();
    }
    if let Some(timeout) = args.timeout {
        config.transcription.timeout = humantime::format_duration(timeout).to_string();
    }
}

/// Run the transcribe command: every matching file goes through the pool,
/// then the summary is written and failures are listed on stderr.
///
/// Only batch-wide problems are errors: a missing API key, a bad glob, a
/// client that cannot be built or an unwritable summary.
pub fn run_transcribe_command(
    mut config: Config,
    args: &TranscribeArgs,
    progress: bool,
) -> Result<BatchReport> {
    apply_overrides(&mut config, args);

    if config.apikey.trim().is_empty() {
        return Err(DgscribeError::MissingApiKey);
    }
    let files = discover(&args.patterns)?;
    if files.is_empty() {
        log::warn!("no files matched {:?}", args.patterns);
    }

    let timeout = config.transcription.timeout()?;
    let client = DeepgramClient::new(
        &config.apikey,
        &config.transcription.endpoint,
        Some(timeout),
    )?;
    let options = TranscriptionOptions {
        model: config.transcription.model.clone(),
        language: config.transcription.language.clone(),
        ..TranscriptionOptions::default()
    };
    let fetcher = TranscriptFetcher::new(Arc::new(client), Arc::new(FfmpegConverter::new()))
        .with_options(options);

    let mut pool = WorkerPool::new(config.pipeline.workers);
    if progress {
        pool = pool.with_progress(Arc::new(BarProgress::new()));
    }

    let report = run_batch(
        &pool,
        Arc::new(FileProcessor::new(fetcher)),
        files,
        &config.pipeline.summary,
    )?;
    print_failures(&report);
    Ok(report)
}

/// Run the captions command: re-render `.srt` files from cached transcripts.
pub fn run_captions_command(patterns: &[String]) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for file in files_from_globs(patterns)? {
        match write_captions(file.as_path()) {
            Ok(output) => log::info!("{file} -> {}", output.display()),
            Err(e) => report.failures.push((file.to_string(), e)),
        }
    }
    print_failures(&report);
    Ok(report)
}

fn print_failures(report: &BatchReport) {
    if report.failures.is_empty() {
        return;
    }
    let header = format!("{} file(s) failed:", report.failures.len());
    if std::io::stderr().is_terminal() {
        eprintln!("{}", header.red().bold());
    } else {
        eprintln!("{header}");
    }
    eprint!("{}", report.render_failures());
}
