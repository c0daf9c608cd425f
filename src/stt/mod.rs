//! Speech-to-text: response model, service seam, remote client and cache.

pub mod cache;
pub mod deepgram;
pub mod service;
pub mod transcript;

pub use cache::{TranscriptFetcher, load_cached};
pub use deepgram::DeepgramClient;
pub use service::{MockTranscriptionService, TranscriptionOptions, TranscriptionService};
pub use transcript::{TranscriptionResult, Word};
