//! Resolve the audio file to submit for a source file.

use crate::defaults::AUDIO_EXTENSIONS;
use crate::error::{DgscribeError, Result};
use crate::media::converter::MediaConverter;
use crate::media::path::{
    FilePath, MediaKind, audio_cache_dir, audio_cache_path, audio_cache_path_with_ext,
    partial_audio_path,
};
use std::fs;
use std::path::PathBuf;

/// Returns a usable audio path for `file`.
///
/// Audio sources come back unchanged. Video sources reuse any previously
/// converted file under `.audio/` (first hit in [`AUDIO_EXTENSIONS`] order),
/// otherwise they are converted exactly once. The converter writes to a
/// scratch path that is renamed into place on success, so a failed or
/// interrupted conversion never looks like a cache hit.
pub fn resolve_audio(converter: &dyn MediaConverter, file: &FilePath) -> Result<PathBuf> {
    match file.kind() {
        MediaKind::Audio => Ok(file.as_path().to_path_buf()),
        MediaKind::Video => {
            if let Some(cached) = cached_audio(file) {
                log::debug!("reusing converted audio {}", cached.display());
                return Ok(cached);
            }
            convert_video(converter, file)
        }
        MediaKind::Unsupported => Err(DgscribeError::UnsupportedFile {
            path: file.to_string(),
        }),
    }
}

/// Finds an existing converted file sharing `file`'s base name.
pub fn cached_audio(file: &FilePath) -> Option<PathBuf> {
    AUDIO_EXTENSIONS
        .iter()
        .map(|ext| audio_cache_path_with_ext(file, ext))
        .find(|candidate| candidate.is_file())
}

fn convert_video(converter: &dyn MediaConverter, file: &FilePath) -> Result<PathBuf> {
    let dir = audio_cache_dir(file);
    fs::create_dir_all(&dir).map_err(|e| DgscribeError::persistence(&dir, e))?;

    let partial = partial_audio_path(file);
    let target = audio_cache_path(file);

    log::info!(
        "converting {file} to {} with {}",
        target.display(),
        converter.name()
    );
    if let Err(e) = converter.convert(file.as_path(), &partial) {
        if partial.exists()
            && let Err(rm) = fs::remove_file(&partial)
        {
            log::warn!("failed to remove partial output {}: {rm}", partial.display());
        }
        return Err(e);
    }

    fs::rename(&partial, &target).map_err(|e| DgscribeError::persistence(&target, e))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::converter::MockConverter;
    use tempfile::TempDir;

    fn source(dir: &TempDir, name: &str) -> FilePath {
        let path = dir.path().join(name);
        fs::write(&path, b"media").unwrap();
        FilePath::from(path)
    }

    #[test]
    fn test_audio_file_is_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        let file = source(&dir, "talk.wav");
        let converter = MockConverter::new();

        let audio = resolve_audio(&converter, &file).unwrap();

        assert_eq!(audio, file.as_path());
        assert_eq!(converter.call_count(), 0);
        assert!(!audio_cache_dir(&file).exists());
    }

    #[test]
    fn test_video_is_converted_once() {
        let dir = TempDir::new().unwrap();
        let file = source(&dir, "talk.mp4");
        let converter = MockConverter::new();

        let first = resolve_audio(&converter, &file).unwrap();
        let second = resolve_audio(&converter, &file).unwrap();

        assert_eq!(first, dir.path().join(".audio/talk.mp3"));
        assert_eq!(first, second);
        assert_eq!(converter.call_count(), 1);
        assert!(!partial_audio_path(&file).exists());
    }

    #[test]
    fn test_existing_audio_in_any_supported_format_is_reused() {
        let dir = TempDir::new().unwrap();
        let file = source(&dir, "talk.mkv");
        fs::create_dir_all(audio_cache_dir(&file)).unwrap();
        let flac = audio_cache_path_with_ext(&file, ".flac");
        fs::write(&flac, b"flac").unwrap();
        let converter = MockConverter::new();

        let audio = resolve_audio(&converter, &file).unwrap();

        assert_eq!(audio, flac);
        assert_eq!(converter.call_count(), 0);
    }

    #[test]
    fn test_cached_audio_follows_extension_priority() {
        let dir = TempDir::new().unwrap();
        let file = source(&dir, "talk.mov");
        fs::create_dir_all(audio_cache_dir(&file)).unwrap();
        fs::write(audio_cache_path_with_ext(&file, ".flac"), b"flac").unwrap();
        fs::write(audio_cache_path_with_ext(&file, ".wav"), b"wav").unwrap();

        assert_eq!(
            cached_audio(&file),
            Some(audio_cache_path_with_ext(&file, ".wav"))
        );
    }

    #[test]
    fn test_conversion_failure_leaves_no_cache_hit() {
        let dir = TempDir::new().unwrap();
        let file = source(&dir, "talk.mp4");
        let converter = MockConverter::new().with_failure();

        let result = resolve_audio(&converter, &file);

        assert!(matches!(result, Err(DgscribeError::Conversion { .. })));
        assert_eq!(cached_audio(&file), None);
    }

    #[test]
    fn test_unsupported_file() {
        let converter = MockConverter::new();
        let result = resolve_audio(&converter, &FilePath::from("notes.txt"));
        assert!(matches!(result, Err(DgscribeError::UnsupportedFile { .. })));
        assert_eq!(converter.call_count(), 0);
    }
}
