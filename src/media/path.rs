//! Path classification and companion-artifact naming.
//!
//! Every artifact the pipeline writes is a pure function of the source path:
//!
//! ```text
//! <dir>/<base><ext>                          source
//! <dir>/.audio/<base>.mp3                    converted audio (video sources only)
//! <dir>/.transcriptions/<base>_response.json cached transcription response
//! <dir>/.graphs/<base>_graph.html            word-count chart
//! <dir>/<base>.srt                           subtitles
//! ```

use crate::defaults::{
    AUDIO_DIR, AUDIO_EXTENSIONS, CANONICAL_AUDIO_EXT, GRAPH_SUFFIX, GRAPHS_DIR, PARTIAL_MARKER,
    TRANSCRIPT_SUFFIX, TRANSCRIPTION_DIR, VIDEO_EXTENSIONS,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a source file is, judged by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Unsupported,
}

/// An immutable source path with the derived views used to name artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePath(PathBuf);

impl FilePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Containing directory. Empty for a bare file name, so joins stay relative.
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Final path component, including the extension.
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Dot-prefixed extension of the final component, or `""`.
    ///
    /// Everything from the last `.` counts, so `.bashrc` has extension
    /// `.bashrc` and an empty base.
    pub fn ext(&self) -> String {
        let name = self.name();
        name.rfind('.')
            .map(|i| name[i..].to_string())
            .unwrap_or_default()
    }

    /// File name without its extension.
    pub fn base(&self) -> String {
        let name = self.name();
        match name.rfind('.') {
            Some(i) => name[..i].to_string(),
            None => name,
        }
    }

    pub fn exists(&self) -> bool {
        self.0.exists()
    }

    pub fn kind(&self) -> MediaKind {
        classify(self)
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for FilePath {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Classifies by case-sensitive extension lookup. Video wins over audio
/// for extensions listed in both tables.
pub fn classify(file: &FilePath) -> MediaKind {
    let ext = file.ext();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Audio
    } else {
        MediaKind::Unsupported
    }
}

/// Directory holding converted audio for sources in `file`'s directory.
pub fn audio_cache_dir(file: &FilePath) -> PathBuf {
    file.dir().join(AUDIO_DIR)
}

/// Cached audio path for `file` with the given dot-prefixed extension.
pub fn audio_cache_path_with_ext(file: &FilePath, ext: &str) -> PathBuf {
    audio_cache_dir(file).join(format!("{}{}", file.base(), ext))
}

/// Where a fresh conversion of `file` ends up.
pub fn audio_cache_path(file: &FilePath) -> PathBuf {
    audio_cache_path_with_ext(file, CANONICAL_AUDIO_EXT)
}

/// Scratch output used while the converter is running.
pub fn partial_audio_path(file: &FilePath) -> PathBuf {
    audio_cache_path_with_ext(file, &format!("{PARTIAL_MARKER}{CANONICAL_AUDIO_EXT}"))
}

pub fn transcript_cache_path(file: &FilePath) -> PathBuf {
    file.dir()
        .join(TRANSCRIPTION_DIR)
        .join(format!("{}{}", file.base(), TRANSCRIPT_SUFFIX))
}

pub fn subtitle_path(file: &FilePath) -> PathBuf {
    file.dir().join(format!("{}.srt", file.base()))
}

pub fn chart_path(file: &FilePath) -> PathBuf {
    file.dir()
        .join(GRAPHS_DIR)
        .join(format!("{}{}", file.base(), GRAPH_SUFFIX))
}
