//! Cloud speech-to-text client
//!
//! Calls the `speech:recognize` REST endpoint with base64 audio and joins the
//! top alternative of every result.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::SpeechTranscriber;
use crate::config::Config;
use crate::error::{LarderError, LarderResult};

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    fn transcript(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|a| a.transcript.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct CloudSpeechClient {
    client: Client,
    url: String,
    api_key: String,
    encoding: String,
    sample_rate: u32,
    language: String,
}

impl CloudSpeechClient {
    pub fn new(config: &Config) -> LarderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(30)))
            .build()?;
        Ok(Self {
            client,
            url: config.speech_url.clone(),
            api_key: config.speech_api_key.clone(),
            encoding: config.speech_encoding.clone(),
            sample_rate: config.speech_sample_rate,
            language: config.speech_language.clone(),
        })
    }

    fn request_body(&self, audio: &[u8]) -> serde_json::Value {
        serde_json::json!({
            "config": {
                "encoding": self.encoding,
                "sampleRateHertz": self.sample_rate,
                "languageCode": self.language,
                "enableAutomaticPunctuation": true
            },
            "audio": { "content": STANDARD.encode(audio) }
        })
    }
}

#[async_trait]
impl SpeechTranscriber for CloudSpeechClient {
    async fn transcribe(&self, audio: &[u8]) -> LarderResult<String> {
        if audio.is_empty() {
            return Err(LarderError::Speech("Empty audio payload".to_string()));
        }

        info!(
            "🧪 Sending {} bytes of audio ({} @ {} Hz)",
            audio.len(),
            self.encoding,
            self.sample_rate
        );

        let mut request = self.client.post(&self.url).json(&self.request_body(audio));
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            warn!("❌ Speech API Error ({}): {}", status, body_text);
            return Err(LarderError::Speech(format!("Speech API answered {status}")));
        }

        debug!("🎙️ Speech raw body: {}", body_text);
        let parsed: RecognizeResponse = serde_json::from_str(&body_text)?;
        Ok(parsed.transcript())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_joins_first_alternatives() {
        let parsed: RecognizeResponse = serde_json::from_str(
            r#"{"results": [
                {"alternatives": [{"transcript": "Chicken."}, {"transcript": "kitchen"}]},
                {"alternatives": []},
                {"alternatives": [{"transcript": "and rice"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.transcript(), "Chicken.\nand rice");
    }

    #[test]
    fn test_no_speech_is_empty_transcript() {
        let parsed: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.transcript(), "");
    }

    #[test]
    fn test_request_body_shape() {
        let client = CloudSpeechClient::new(&Config::default()).unwrap();
        let body = client.request_body(b"abc");
        assert_eq!(body["config"]["encoding"], "WEBM_OPUS");
        assert_eq!(body["config"]["sampleRateHertz"], 48000);
        assert_eq!(body["config"]["enableAutomaticPunctuation"], true);
        assert_eq!(body["audio"]["content"], "YWJj");
    }
}
