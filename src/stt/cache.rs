//! Fetch-or-reuse for transcription responses.
//!
//! A response is cached as pretty-printed JSON under `.transcriptions/` next
//! to the source file. Once written it is never overwritten: later runs read
//! it back and never reach the service.

use crate::error::{DgscribeError, Result};
use crate::media::audio::resolve_audio;
use crate::media::converter::MediaConverter;
use crate::media::path::{FilePath, MediaKind, transcript_cache_path};
use crate::stt::service::{TranscriptionOptions, TranscriptionService};
use crate::stt::transcript::TranscriptionResult;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Reads a cached transcript. Unparseable content is an error, never a miss.
pub fn load_cached(path: &Path) -> Result<TranscriptionResult> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|source| DgscribeError::CacheCorrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `result` to `path`, creating the parent directory.
///
/// The JSON is staged in a temporary file in the same directory and renamed
/// over `path`, so readers see either no cache or a complete one.
pub fn persist(path: &Path, result: &TranscriptionResult) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DgscribeError::persistence(dir, e))?;

    let staged = NamedTempFile::new_in(dir).map_err(|e| DgscribeError::persistence(dir, e))?;
    let mut writer = BufWriter::new(staged);
    serde_json::to_writer_pretty(&mut writer, result)
        .map_err(|e| DgscribeError::persistence(path, e.into()))?;
    let staged = writer
        .into_inner()
        .map_err(|e| DgscribeError::persistence(path, e.into_error()))?;
    staged
        .persist(path)
        .map_err(|e| DgscribeError::persistence(path, e.error))?;
    Ok(())
}

/// Resolves the transcript for a source file, calling the service only on a
/// cache miss.
pub struct TranscriptFetcher {
    service: Arc<dyn TranscriptionService>,
    converter: Arc<dyn MediaConverter>,
    options: TranscriptionOptions,
}

impl TranscriptFetcher {
    pub fn new(
        service: Arc<dyn TranscriptionService>,
        converter: Arc<dyn MediaConverter>,
    ) -> Self {
        Self {
            service,
            converter,
            options: TranscriptionOptions::default(),
        }
    }

    /// Sets the options sent with every request.
    pub fn with_options(mut self, options: TranscriptionOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the transcript for `file`.
    ///
    /// `Ok(None)` means the file is neither audio nor video and should be
    /// left out of the batch without counting as a failure.
    pub fn fetch(&self, file: &FilePath) -> Result<Option<TranscriptionResult>> {
        let cache = transcript_cache_path(file);
        if cache.exists() {
            log::info!("reusing cached transcript {}", cache.display());
            return load_cached(&cache).map(Some);
        }

        if file.kind() == MediaKind::Unsupported {
            log::warn!("{file} is not a supported audio or video file, skipping");
            return Ok(None);
        }

        let audio = resolve_audio(self.converter.as_ref(), file)?;

        log::info!("transcribing {file} with {}", self.service.name());
        let result = self.service.transcribe(&audio, &self.options)?;

        persist(&cache, &result)?;
        log::info!("transcript saved to {}", cache.display());

        Ok(Some(result))
    }
}
