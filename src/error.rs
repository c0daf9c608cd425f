//! Error types for dgscribe.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DgscribeError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("No API key configured (set `apikey` in the config file or DGSCRIBE_APIKEY)")]
    MissingApiKey,

    // Input discovery errors
    #[error("Invalid glob pattern {pattern:?}: {message}")]
    Glob { pattern: String, message: String },

    #[error("File {path:?} is not a supported audio or video file")]
    UnsupportedFile { path: String },

    // Media conversion errors
    #[error("Converting {source_path:?} to {destination:?} failed: {message}")]
    Conversion {
        source_path: String,
        destination: String,
        message: String,
    },

    // Transcription errors
    #[error("Transcription service error ({code}) {message}")]
    TranscriptionService { code: String, message: String },

    #[error("Getting response from transcription service: {0}")]
    TranscriptionTransport(#[from] reqwest::Error),

    #[error("Invalid transcription response: {message}")]
    InvalidResponse { message: String },

    #[error("Failed to build transcription client: {message}")]
    ClientBuild { message: String },

    // Artifact errors
    #[error("Cached transcript {path} is corrupt: {source}")]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Media duration {duration}s is not usable for rate calculation")]
    DegenerateMedia { duration: f64 },

    #[error("Failed to write summary {path}: {source}")]
    SummaryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl DgscribeError {
    /// Wraps an I/O failure on an artifact write with the artifact path.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DgscribeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unsupported_file_display() {
        let error = DgscribeError::UnsupportedFile {
            path: "notes.txt".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "File \"notes.txt\" is not a supported audio or video file"
        );
    }

    #[test]
    fn test_conversion_display_names_both_paths() {
        let error = DgscribeError::Conversion {
            source_path: "talk.mp4".to_string(),
            destination: ".audio/talk.mp3".to_string(),
            message: "exit status 1".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("\"talk.mp4\""));
        assert!(msg.contains("\".audio/talk.mp3\""));
        assert!(msg.ends_with("exit status 1"));
    }

    #[test]
    fn test_transcription_service_display() {
        let error = DgscribeError::TranscriptionService {
            code: "INVALID_AUTH".to_string(),
            message: "Invalid credentials.".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription service error (INVALID_AUTH) Invalid credentials."
        );
    }

    #[test]
    fn test_degenerate_media_display() {
        let error = DgscribeError::DegenerateMedia { duration: 0.0 };
        assert_eq!(
            error.to_string(),
            "Media duration 0s is not usable for rate calculation"
        );
    }

    #[test]
    fn test_glob_display() {
        let error = DgscribeError::Glob {
            pattern: "[".to_string(),
            message: "invalid range pattern".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid glob pattern \"[\": invalid range pattern"
        );
    }

    #[test]
    fn test_persistence_keeps_source() {
        let error = DgscribeError::persistence(
            "/tmp/x.srt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
        assert!(error.to_string().contains("/tmp/x.srt"));
    }

    #[test]
    fn test_cache_corrupt_keeps_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = DgscribeError::CacheCorrupt {
            path: PathBuf::from("a_response.json"),
            source: json_error,
        };
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: DgscribeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: DgscribeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<DgscribeError>();
        assert_sync::<DgscribeError>();
    }
}
