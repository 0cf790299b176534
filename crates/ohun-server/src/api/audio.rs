//! PCM-to-WAV encoding endpoint

use axum::Json;
use ohun_core::{AudioEncoder, BitDepth, EncodedAudio, PcmFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

/// Channel counts above this are rejected
pub const MAX_CHANNELS: u16 = 8;

/// Largest WAV payload the endpoint will build, before base64
pub const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Raw float samples to wrap as a WAV data URI
#[derive(Debug, Deserialize)]
pub struct EncodeRequest {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
    #[serde(default = "default_bits_per_sample")]
    pub bits_per_sample: u16,
}

fn default_channels() -> u16 {
    1
}

fn default_bits_per_sample() -> u16 {
    16
}

/// Playable audio, shared by the encode and speech endpoints
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub audio_uri: String,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub duration_ms: f32,
}

impl From<EncodedAudio> for AudioResponse {
    fn from(audio: EncodedAudio) -> Self {
        Self {
            audio_uri: audio.data_uri,
            sample_rate: audio.sample_rate,
            sample_count: audio.sample_count,
            duration_ms: audio.duration_ms,
        }
    }
}

pub async fn encode(Json(req): Json<EncodeRequest>) -> Result<Json<AudioResponse>, ApiError> {
    let bit_depth = BitDepth::from_bits(req.bits_per_sample).ok_or_else(|| {
        ApiError::bad_request(format!(
            "Unsupported bits_per_sample {}; expected 8, 16, 24 or 32",
            req.bits_per_sample
        ))
    })?;

    if req.channels == 0 || req.channels > MAX_CHANNELS {
        return Err(ApiError::bad_request(format!(
            "Unsupported channel count {}; expected 1 to {}",
            req.channels, MAX_CHANNELS
        )));
    }

    let format = PcmFormat::checked(req.sample_rate, req.channels, bit_depth)?;
    let payload_len = format.data_len(req.samples.len());
    if payload_len > MAX_PAYLOAD_BYTES {
        return Err(ApiError::payload_too_large(format!(
            "Encoded audio would be {} bytes; the limit is {}",
            payload_len, MAX_PAYLOAD_BYTES
        )));
    }

    debug!(
        "Encoding {} samples at {} Hz, {} channel(s), {}-bit",
        req.samples.len(),
        req.sample_rate,
        req.channels,
        req.bits_per_sample
    );

    Ok(Json(AudioEncoder::with_format(format).data_uri(&req.samples).into()))
}
