//! SubRip subtitle rendering.

use crate::defaults::{SRT_LINE_LENGTH, TRANSCRIPT_SUFFIX};
use crate::error::{DgscribeError, Result};
use crate::stt::cache::load_cached;
use crate::stt::transcript::{TranscriptionResult, Word};
use std::fs;
use std::path::{Path, PathBuf};

/// Splits the transcript into cue-sized word groups.
///
/// Utterances are preferred because they already break at speaker turns and
/// pauses. Without them, the first channel's primary alternative is chunked.
pub fn cue_lines(result: &TranscriptionResult, line_length: usize) -> Vec<&[Word]> {
    let line_length = line_length.max(1);
    match &result.results.utterances {
        Some(utterances) if !utterances.is_empty() => utterances
            .iter()
            .flat_map(|u| u.words.chunks(line_length))
            .collect(),
        _ => result
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.words.chunks(line_length).collect())
            .unwrap_or_default(),
    }
}

/// Formats seconds as `HH:MM:SS,mmm`.
pub fn timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Renders the transcript as SRT text with the default cue length.
pub fn render(result: &TranscriptionResult) -> String {
    render_with_line_length(result, SRT_LINE_LENGTH)
}

pub fn render_with_line_length(result: &TranscriptionResult, line_length: usize) -> String {
    let mut out = String::new();
    let mut current_speaker: Option<u32> = None;

    for (index, words) in cue_lines(result, line_length).into_iter().enumerate() {
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            continue;
        };

        out.push_str(&format!("{}\n", index + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            timestamp(first.start),
            timestamp(last.end)
        ));
        if let Some(speaker) = first.speaker
            && current_speaker != Some(speaker)
        {
            current_speaker = Some(speaker);
            out.push_str(&format!("[speaker {speaker}]\n"));
        }
        let text: Vec<&str> = words.iter().map(Word::text).collect();
        out.push_str(&text.join(" "));
        out.push_str("\n\n");
    }

    out
}

/// Subtitle path for a cached transcript: `talk_response.json` becomes
/// `talk.srt` in the same directory.
pub fn caption_path_for(transcript: &Path) -> PathBuf {
    let name = transcript
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match name.strip_suffix(TRANSCRIPT_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    transcript.with_file_name(format!("{stem}.srt"))
}

/// Re-renders subtitles from a cached transcript, replacing any existing file.
pub fn write_captions(transcript: &Path) -> Result<PathBuf> {
    let result = load_cached(transcript)?;
    let output = caption_path_for(transcript);
    fs::write(&output, render(&result)).map_err(|e| DgscribeError::persistence(&output, e))?;
    Ok(output)
}
