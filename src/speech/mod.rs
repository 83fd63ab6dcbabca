//! Speech Transcription
//!
//! Voice input for the pantry: recorded audio goes to a cloud speech-to-text
//! service and the transcript is treated like typed text.

pub mod cloud;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::LarderResult;
use crate::matching::normalize_name;

pub use cloud::CloudSpeechClient;

/// Trait for speech-to-text backends
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe an encoded audio payload into plain text
    async fn transcribe(&self, audio: &[u8]) -> LarderResult<String>;
}

/// Normalized transcript, or `None` when nothing usable was heard
pub fn candidate_from(transcript: &str) -> Option<String> {
    let candidate = normalize_name(transcript);
    (!candidate.is_empty()).then_some(candidate)
}

/// Transcribe audio into a candidate ingredient name or search query.
///
/// Failures are logged and dropped; the result is normalized and `None` when blank.
pub async fn transcribe_candidate(
    transcriber: &dyn SpeechTranscriber,
    audio: &[u8],
) -> Option<String> {
    match transcriber.transcribe(audio).await {
        Ok(text) => {
            let candidate = candidate_from(&text);
            debug!("📝 Heard: '{}' -> {:?}", text, candidate);
            candidate
        }
        Err(e) => {
            warn!("❌ Transcription failed: {}", e);
            None
        }
    }
}
