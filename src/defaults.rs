//! Default configuration constants for dgscribe.
//!
//! Shared by the config layer, the path classifier and the pipeline so the
//! same values are not spelled out in several places.

/// Number of concurrent per-file workers.
pub const WORKERS: usize = 4;

/// Acoustic model requested from the transcription service.
pub const DEFAULT_MODEL: &str = "nova-2";

/// Language code sent with every transcription request.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Pre-recorded transcription endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.deepgram.com/v1/listen";

/// Per-request timeout for the transcription call.
///
/// Long recordings take minutes of remote compute, so this is generous.
pub const DEFAULT_TIMEOUT: &str = "10m";

/// Summary report written to the working directory.
pub const SUMMARY_FILE: &str = "wpms.json";

/// Subdirectory (next to the source file) holding converted audio.
pub const AUDIO_DIR: &str = ".audio";

/// Subdirectory holding cached transcription responses.
pub const TRANSCRIPTION_DIR: &str = ".transcriptions";

/// Subdirectory holding rendered word-count charts.
pub const GRAPHS_DIR: &str = ".graphs";

/// Extension of converted audio.
pub const CANONICAL_AUDIO_EXT: &str = ".mp3";

/// Marker inserted before the extension while a conversion is in flight.
pub const PARTIAL_MARKER: &str = ".partial";

/// Suffix appended to the base name of a cached transcript.
pub const TRANSCRIPT_SUFFIX: &str = "_response.json";

/// Suffix appended to the base name of a rendered chart.
pub const GRAPH_SUFFIX: &str = "_graph.html";

/// Longest media duration accepted from a transcript, in seconds (one week).
///
/// Anything longer is treated as a malformed transcript.
pub const MAX_MEDIA_SECONDS: f64 = 7.0 * 24.0 * 60.0 * 60.0;

/// Maximum number of words in one subtitle cue.
pub const SRT_LINE_LENGTH: usize = 8;

/// Video extensions. Checked before the audio table.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mov", ".avi", ".mkv", ".flv", ".wmv", ".webm", ".m4v", ".3gp", ".3g2", ".asf",
];

/// Audio extensions, in audio-cache lookup priority order.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    ".wav", ".mp3", ".m4a", ".flac", ".ogg", ".opus", ".webm", ".aac", ".wma", ".aiff", ".aif",
    ".aifc", ".caf", ".amr", ".au", ".snd", ".gsm", ".m4r", ".3gp", ".3g2", ".aa", ".aax", ".act",
    ".aup", ".awb", ".dct", ".dss", ".dvf", ".ivs", ".m4b", ".m4p", ".mmf", ".mpc", ".msv", ".nmf",
    ".nsf", ".oga", ".mogg", ".ra", ".rm", ".raw", ".sln", ".tta", ".vox", ".wv", ".8svx", ".cda",
];

/// Companion suffixes left behind by browsers and download managers.
pub const DOWNLOAD_SUFFIXES: &[&str] = &[
    ".part",
    ".crdownload",
    ".download",
    ".partial",
    ".tmp",
    ".aria2",
];
