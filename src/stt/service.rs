use crate::defaults;
use crate::error::{DgscribeError, Result};
use crate::stt::transcript::TranscriptionResult;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Trait for a remote speech-to-text service.
///
/// One instance is shared read-only by every worker, so implementations
/// must be safe for concurrent callers.
pub trait TranscriptionService: Send + Sync {
    /// Transcribe the audio file at `audio`.
    ///
    /// Blocks until the service answers, which may take minutes.
    fn transcribe(&self, audio: &Path, options: &TranscriptionOptions)
    -> Result<TranscriptionResult>;

    /// Name of the service, for logs.
    fn name(&self) -> &str;
}

/// Implement TranscriptionService for Arc<T> to allow sharing across workers.
impl<T: TranscriptionService> TranscriptionService for Arc<T> {
    fn transcribe(
        &self,
        audio: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult> {
        (**self).transcribe(audio, options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Request options sent with every transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionOptions {
    pub model: String,
    pub language: String,
    pub punctuate: bool,
    pub paragraphs: bool,
    pub smart_format: bool,
    pub diarize: bool,
    pub utterances: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            punctuate: true,
            paragraphs: true,
            smart_format: true,
            diarize: true,
            utterances: true,
        }
    }
}

impl TranscriptionOptions {
    /// Options as query parameters, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("model", self.model.clone()),
            ("language", self.language.clone()),
            ("punctuate", self.punctuate.to_string()),
            ("paragraphs", self.paragraphs.to_string()),
            ("smart_format", self.smart_format.to_string()),
            ("diarize", self.diarize.to_string()),
            ("utterances", self.utterances.to_string()),
        ]
    }
}

/// Mock transcription service for testing
///
/// Counts calls so tests can assert that cached transcripts never reach
/// the service.
#[derive(Debug)]
pub struct MockTranscriptionService {
    response: TranscriptionResult,
    failure: Option<(String, String)>,
    calls: AtomicUsize,
    requested: Mutex<Vec<PathBuf>>,
}

impl MockTranscriptionService {
    /// Create a mock that answers every request with `response`.
    pub fn new(response: TranscriptionResult) -> Self {
        Self {
            response,
            failure: None,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to fail with a structured service error
    pub fn with_failure(mut self, code: &str, message: &str) -> Self {
        self.failure = Some((code.to_string(), message.to_string()));
        self
    }

    /// Number of times `transcribe` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Audio paths submitted, in call order.
    pub fn requested(&self) -> Vec<PathBuf> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl TranscriptionService for MockTranscriptionService {
    fn transcribe(
        &self,
        audio: &Path,
        _options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(audio.to_path_buf());
        }
        match &self.failure {
            Some((code, message)) => Err(DgscribeError::TranscriptionService {
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(self.response.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::transcript::fixtures::transcript;

    #[test]
    fn test_default_options_enable_everything() {
        let options = TranscriptionOptions::default();
        assert_eq!(options.model, "nova-2");
        assert_eq!(options.language, "en-US");
        assert!(options.punctuate);
        assert!(options.paragraphs);
        assert!(options.smart_format);
        assert!(options.diarize);
        assert!(options.utterances);
    }

    #[test]
    fn test_query_pairs() {
        let pairs = TranscriptionOptions::default().query_pairs();
        assert_eq!(pairs[0], ("model", "nova-2".to_string()));
        assert!(pairs.contains(&("smart_format", "true".to_string())));
        assert_eq!(pairs.len(), 7);
    }

    #[test]
    fn test_mock_returns_response_and_counts() {
        let service = MockTranscriptionService::new(transcript(3, 60.0));
        let result = service
            .transcribe(Path::new("a.wav"), &TranscriptionOptions::default())
            .unwrap();
        assert_eq!(result.word_count(), 3);
        assert_eq!(service.call_count(), 1);
        assert_eq!(service.requested(), vec![PathBuf::from("a.wav")]);
    }

    #[test]
    fn test_mock_failure_is_structured() {
        let service =
            MockTranscriptionService::new(transcript(0, 1.0)).with_failure("BAD", "nope");
        let result = service.transcribe(Path::new("a.wav"), &TranscriptionOptions::default());
        match result {
            Err(DgscribeError::TranscriptionService { code, message }) => {
                assert_eq!(code, "BAD");
                assert_eq!(message, "nope");
            }
            other => panic!("Expected TranscriptionService error, got {other:?}"),
        }
    }
}
