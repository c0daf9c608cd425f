//! Input discovery: expand CLI glob patterns into source paths.

use crate::defaults::DOWNLOAD_SUFFIXES;
use crate::error::{DgscribeError, Result};
use crate::media::path::FilePath;
use std::path::{Path, PathBuf};

/// Expands every pattern in order and concatenates the matches.
///
/// A pattern that matches nothing contributes nothing. Duplicates across
/// patterns are kept, since each occurrence is its own job.
pub fn files_from_globs(patterns: &[String]) -> Result<Vec<FilePath>> {
    let mut files = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let matches = glob::glob(pattern).map_err(|e| DgscribeError::Glob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for entry in matches {
            match entry {
                Ok(path) => files.push(FilePath::from(path)),
                // Unreadable directories are skipped, not fatal
                Err(e) => log::debug!("skipping unreadable match for {pattern:?}: {e}"),
            }
        }
    }
    Ok(files)
}

/// Like [`files_from_globs`], minus files that are still being downloaded.
pub fn discover(patterns: &[String]) -> Result<Vec<FilePath>> {
    let files = files_from_globs(patterns)?;
    Ok(files
        .into_iter()
        .filter(|file| {
            let downloading = is_being_downloaded(file.as_path());
            if downloading {
                log::warn!("{file} is still being downloaded, skipping");
            }
            !downloading
        })
        .collect())
}

/// Whether a browser or download manager still holds a temp file for `path`.
///
/// Checks `<path><suffix>`, `<dir>/<base><suffix>` and the hash-named
/// variant `<dir>/<base>.*<ext><suffix>`.
pub fn is_being_downloaded(path: &Path) -> bool {
    let file = FilePath::new(path);
    let dir = file.dir();
    let base = file.base();
    let ext = file.ext();

    for suffix in DOWNLOAD_SUFFIXES {
        let mut whole = path.as_os_str().to_owned();
        whole.push(suffix);
        if PathBuf::from(whole).exists() {
            return true;
        }
        if dir.join(format!("{base}{suffix}")).exists() {
            return true;
        }
    }

    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let escaped_base = glob::Pattern::escape(&base);
    let escaped_ext = glob::Pattern::escape(&ext);
    for suffix in DOWNLOAD_SUFFIXES {
        let name = format!("{escaped_base}.*{escaped_ext}{suffix}");
        let pattern = if escaped_dir.is_empty() {
            name
        } else {
            format!("{escaped_dir}/{name}")
        };
        if let Ok(mut matches) = glob::glob(&pattern)
            && matches.any(|m| m.is_ok())
        {
            return true;
        }
    }

    false
}
