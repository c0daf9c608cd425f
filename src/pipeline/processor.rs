//! Per-file pipeline: transcript, chart, subtitles, speaking rate.

use crate::error::{DgscribeError, Result};
use crate::media::path::{FilePath, chart_path, subtitle_path};
use crate::pipeline::types::FileResult;
use crate::render::{chart, srt};
use crate::stt::cache::TranscriptFetcher;
use crate::stt::transcript::TranscriptionResult;
use std::fs;
use std::sync::Arc;

/// Work a pool worker performs for one file.
///
/// `Ok(None)` is a skip: the file produces no outcome at all.
pub trait ProcessFile: Send + Sync {
    fn process(&self, file: &FilePath) -> Result<Option<FileResult>>;
}

impl<T: ProcessFile> ProcessFile for Arc<T> {
    fn process(&self, file: &FilePath) -> Result<Option<FileResult>> {
        (**self).process(file)
    }
}

pub struct FileProcessor {
    fetcher: TranscriptFetcher,
}

impl FileProcessor {
    pub fn new(fetcher: TranscriptFetcher) -> Self {
        Self { fetcher }
    }
}

impl ProcessFile for FileProcessor {
    fn process(&self, file: &FilePath) -> Result<Option<FileResult>> {
        let Some(transcript) = self.fetcher.fetch(file)? else {
            return Ok(None);
        };

        // validated before any artifact is derived from it
        transcript.checked_duration()?;

        let graph = chart_path(file);
        chart::write_chart(&graph, &file.to_string(), &transcript)?;
        log::debug!("chart written to {}", graph.display());

        write_subtitles_once(file, &transcript)?;

        let wpm = transcript.words_per_minute()?;
        log::info!("{file}: {wpm:.1} words per minute");
        Ok(Some(FileResult::new(file.to_string(), wpm)))
    }
}

/// Writes the sibling `.srt` unless one is already there.
fn write_subtitles_once(file: &FilePath, transcript: &TranscriptionResult) -> Result<()> {
    let path = subtitle_path(file);
    if path.exists() {
        log::debug!("subtitles {} already exist", path.display());
        return Ok(());
    }
    fs::write(&path, srt::render(transcript)).map_err(|e| DgscribeError::persistence(&path, e))?;
    log::info!("subtitles written to {}", path.display());
    Ok(())
}
