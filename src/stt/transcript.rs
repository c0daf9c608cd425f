//! Transcription response model.
//!
//! Mirrors the pre-recorded response of the remote service closely enough
//! that a cached artifact round-trips. Fields the pipeline never reads are
//! optional so older or trimmed caches still deserialize.

use crate::defaults::MAX_MEDIA_SECONDS;
use crate::error::{DgscribeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A complete transcription response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub results: Results,
    /// Response fields not modelled above, kept so the cache stays lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Media duration in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Results {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<Utterance>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punctuated_word: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Word {
    /// Display form: punctuated when the service provided it.
    pub fn text(&self) -> &str {
        self.punctuated_word.as_deref().unwrap_or(&self.word)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub channel: u32,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptionResult {
    /// Words of each channel's primary alternative, in channel order.
    pub fn primary_words(&self) -> impl Iterator<Item = &Word> {
        self.results
            .channels
            .iter()
            .filter_map(|c| c.alternatives.first())
            .flat_map(|a| a.words.iter())
    }

    /// Total recognised words across every channel's primary alternative.
    pub fn word_count(&self) -> usize {
        self.primary_words().count()
    }

    pub fn duration(&self) -> f64 {
        self.metadata.duration
    }

    /// The media duration, if it is usable for rates and charts.
    ///
    /// Zero, negative, non-finite and implausibly long durations mean the
    /// transcript is malformed.
    pub fn checked_duration(&self) -> Result<f64> {
        let duration = self.metadata.duration;
        if !duration.is_finite() || duration <= 0.0 || duration > MAX_MEDIA_SECONDS {
            return Err(DgscribeError::DegenerateMedia { duration });
        }
        Ok(duration)
    }

    /// Words per minute over the whole media duration.
    pub fn words_per_minute(&self) -> Result<f64> {
        let duration = self.checked_duration()?;
        Ok(self.word_count() as f64 / (duration / 60.0))
    }
}
