//! Text-to-speech synthesis

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::audio::EncodedAudio;
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::speech::PcmAudio;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct SpeechClient {
    api: ApiClient,
}

impl SpeechClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Request float PCM for `text` from the speech service.
    pub async fn synthesize(&self, text: &str) -> Result<PcmAudio> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        let endpoint = &self.api.config().tts_endpoint;
        info!("Requesting speech for {} chars from {}", text.len(), endpoint);

        let payload: Option<Value> = self.api.post_json(endpoint, &SpeechRequest { text }).await?;
        let payload = payload.ok_or_else(|| {
            Error::InvalidSpeechPayload("speech service returned no content".to_string())
        })?;

        let audio = PcmAudio::from_json(&payload)?;
        debug!(
            "Received {} samples at {} Hz",
            audio.samples.len(),
            audio.sample_rate
        );
        Ok(audio)
    }

    /// Synthesize `text` and encode it as a playable WAV data URI.
    pub async fn speak(&self, text: &str) -> Result<EncodedAudio> {
        Ok(self.synthesize(text).await?.encode())
    }
}
