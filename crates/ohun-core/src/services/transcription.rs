//! Speech-to-text transcription of recorded audio

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use crate::client::ApiClient;
use crate::error::{Error, Result};

pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    transcript: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    api: ApiClient,
}

impl TranscriptionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload a recording and return its transcript.
    pub async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::EmptyAudio);
        }
        let endpoint = self
            .api
            .config()
            .stt_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration("STT API endpoint is not configured.".to_string())
            })?;

        info!(
            "Transcribing {} bytes of {} via {}",
            audio.len(),
            mime_type,
            endpoint
        );

        let part = Part::bytes(audio)
            .file_name(recording_file_name(mime_type))
            .mime_str(mime_type)?;
        let form = Form::new().part("audio_file", part);

        let response: Option<TranscriptionResponse> =
            self.api.post_multipart(endpoint, form).await?;
        response
            .and_then(|r| r.transcript)
            .ok_or_else(|| Error::missing("transcription", "transcript"))
    }
}

fn recording_file_name(mime_type: &str) -> String {
    let extension = mime_type
        .split('/')
        .nth(1)
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or("mp3");
    format!("recording.{}", extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_file_name_uses_mime_subtype() {
        assert_eq!(recording_file_name("audio/wav"), "recording.wav");
        assert_eq!(recording_file_name(DEFAULT_MIME_TYPE), "recording.mpeg");
        assert_eq!(recording_file_name("audio"), "recording.mp3");
        assert_eq!(recording_file_name("audio/"), "recording.mp3");
    }
}
