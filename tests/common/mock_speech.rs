//! Mock Speech Transcriber for Testing
//!
//! Returns a canned transcript (or failure) and records received audio.

use async_trait::async_trait;
use larder::error::{LarderError, LarderResult};
use larder::speech::SpeechTranscriber;
use std::sync::{Arc, Mutex};

pub struct MockSpeech {
    /// `None` makes every call fail
    pub transcript: Option<String>,
    /// Every payload received, for verification
    pub received: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockSpeech {
    pub fn with_transcript(text: &str) -> Self {
        Self {
            transcript: Some(text.to_string()),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: None,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SpeechTranscriber for MockSpeech {
    async fn transcribe(&self, audio: &[u8]) -> LarderResult<String> {
        if let Ok(mut received) = self.received.lock() {
            received.push(audio.to_vec());
        }
        self.transcript
            .clone()
            .ok_or_else(|| LarderError::Speech("mock transcriber offline".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_speech_records_audio() {
        let mock = MockSpeech::with_transcript("garlic");
        assert_eq!(mock.transcribe(b"RIFF").await.unwrap(), "garlic");
        assert_eq!(mock.received.lock().unwrap().len(), 1);
        assert!(MockSpeech::failing().transcribe(b"").await.is_err());
    }
}
