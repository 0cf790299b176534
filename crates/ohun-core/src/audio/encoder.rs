//! Audio encoding to playable output formats

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::io::Cursor;
use tracing::debug;

use super::wav::{encode_wav, quantize_i16, PcmFormat};
use crate::error::{Error, Result};

/// Scheme prefix of every WAV data URI produced here
pub const WAV_DATA_URI_PREFIX: &str = "data:audio/wav;base64,";

/// Supported audio output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV container (integer PCM)
    Wav,
    /// Raw PCM samples (f32)
    RawF32,
    /// Raw PCM samples (i16)
    RawI16,
}

/// Audio encoder for converting f32 samples to playable formats
#[derive(Debug, Clone, Copy)]
pub struct AudioEncoder {
    format: PcmFormat,
}

impl AudioEncoder {
    /// Create a 16-bit encoder
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            format: PcmFormat::mono(sample_rate).with_channels(channels),
        }
    }

    pub fn with_format(format: PcmFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Encode samples to the specified format
    pub fn encode(&self, samples: &[f32], format: AudioFormat) -> Vec<u8> {
        match format {
            AudioFormat::Wav => encode_wav(samples, self.format),
            AudioFormat::RawF32 => self.encode_raw_f32(samples),
            AudioFormat::RawI16 => self.encode_raw_i16(samples),
        }
    }

    /// Encode to a WAV data URI along with playback metadata
    pub fn data_uri(&self, samples: &[f32]) -> EncodedAudio {
        let data_uri = encode_pcm_to_wav_data_uri_with(samples, self.format);
        EncodedAudio::new(data_uri, samples.len(), self.format.sample_rate)
    }

    fn encode_raw_f32(&self, samples: &[f32]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 4);
        for &sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    fn encode_raw_i16(&self, samples: &[f32]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            bytes.extend_from_slice(&quantize_i16(sample).to_le_bytes());
        }
        bytes
    }

    /// Get content type for format
    pub fn content_type(format: AudioFormat) -> &'static str {
        match format {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::RawF32 => "application/octet-stream",
            AudioFormat::RawI16 => "application/octet-stream",
        }
    }
}

/// Encoded speech ready to hand to a playback facility
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedAudio {
    pub data_uri: String,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub duration_ms: f32,
}

impl EncodedAudio {
    pub fn new(data_uri: String, sample_count: usize, sample_rate: u32) -> Self {
        let duration_ms = if sample_rate == 0 {
            0.0
        } else {
            (sample_count as f32 / sample_rate as f32) * 1000.0
        };
        Self {
            data_uri,
            sample_rate,
            sample_count,
            duration_ms,
        }
    }
}

/// Encode mono samples as a 16-bit WAV `data:` URI.
pub fn encode_pcm_to_wav_data_uri(samples: &[f32], sample_rate: u32) -> String {
    encode_pcm_to_wav_data_uri_with(samples, PcmFormat::mono(sample_rate))
}

/// Encode samples as a WAV `data:` URI with an explicit PCM layout.
pub fn encode_pcm_to_wav_data_uri_with(samples: &[f32], format: PcmFormat) -> String {
    let wav = encode_wav(samples, format);
    let mut uri = String::with_capacity(WAV_DATA_URI_PREFIX.len() + wav.len().div_ceil(3) * 4);
    uri.push_str(WAV_DATA_URI_PREFIX);
    STANDARD.encode_string(&wav, &mut uri);
    uri
}

/// A WAV data URI decoded back into its header fields and samples
#[derive(Debug, Clone)]
pub struct DecodedWav {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Number of frames (samples per channel)
    pub frames: u32,
    /// Interleaved integer samples
    pub samples: Vec<i32>,
    /// The raw WAV file
    pub bytes: Vec<u8>,
}

/// Parse a `data:audio/wav;base64,` URI and decode its WAV payload.
pub fn decode_wav_data_uri(uri: &str) -> Result<DecodedWav> {
    let payload = uri.strip_prefix(WAV_DATA_URI_PREFIX).ok_or_else(|| {
        Error::InvalidDataUri(format!("expected prefix '{}'", WAV_DATA_URI_PREFIX))
    })?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidDataUri(e.to_string()))?;

    let mut reader = hound::WavReader::new(Cursor::new(bytes.as_slice()))?;
    let spec = reader.spec();
    let frames = reader.duration();
    let samples = reader
        .samples::<i32>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(
        "Decoded WAV data URI: {} Hz, {} ch, {} frames",
        spec.sample_rate, spec.channels, frames
    );

    Ok(DecodedWav {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames,
        samples,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::{BitDepth, WAV_HEADER_LEN};

    #[test]
    fn test_reference_scenario() {
        let uri = encode_pcm_to_wav_data_uri(&[0.0, 0.5, -0.5, 1.0, -1.0], 16000);
        assert!(uri.starts_with("data:audio/wav;base64,"));

        let decoded = decode_wav_data_uri(&uri).unwrap();
        assert_eq!(decoded.bytes.len(), 54);
        assert_eq!(
            u32::from_le_bytes(decoded.bytes[40..44].try_into().unwrap()),
            10
        );
        assert_eq!(decoded.samples, vec![0, 16384, -16384, 32767, -32768]);
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.bits_per_sample, 16);
    }

    #[test]
    fn test_empty_samples_encode_header_only() {
        let uri = encode_pcm_to_wav_data_uri(&[], 22050);
        let decoded = decode_wav_data_uri(&uri).unwrap();

        assert_eq!(decoded.bytes.len(), WAV_HEADER_LEN);
        assert_eq!(
            u32::from_le_bytes(decoded.bytes[4..8].try_into().unwrap()),
            36
        );
        assert_eq!(
            u32::from_le_bytes(decoded.bytes[24..28].try_into().unwrap()),
            22050
        );
        assert_eq!(
            u32::from_le_bytes(decoded.bytes[40..44].try_into().unwrap()),
            0
        );
        assert_eq!(decoded.frames, 0);
        assert!(decoded.samples.is_empty());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let samples: Vec<f32> = (0..512).map(|i| (i as f32 * 0.05).sin()).collect();
        assert_eq!(
            encode_pcm_to_wav_data_uri(&samples, 24000),
            encode_pcm_to_wav_data_uri(&samples, 24000)
        );
    }

    #[test]
    fn test_encoder_formats() {
        let encoder = AudioEncoder::new(16000, 1);
        let samples = [0.5, -2.0];

        assert_eq!(encoder.encode(&samples, AudioFormat::Wav).len(), 48);
        assert_eq!(
            encoder.encode(&samples, AudioFormat::RawI16),
            [16384i16.to_le_bytes(), (-32768i16).to_le_bytes()].concat()
        );
        assert_eq!(encoder.encode(&samples, AudioFormat::RawF32).len(), 8);
        assert_eq!(AudioEncoder::content_type(AudioFormat::Wav), "audio/wav");
    }

    #[test]
    fn test_encoded_audio_metadata() {
        let encoder = AudioEncoder::new(16000, 1);
        let encoded = encoder.data_uri(&[0.0; 8000]);

        assert_eq!(encoded.sample_count, 8000);
        assert_eq!(encoded.sample_rate, 16000);
        assert!((encoded.duration_ms - 500.0).abs() < 1e-3);

        let silent = EncodedAudio::new(String::new(), 10, 0);
        assert_eq!(silent.duration_ms, 0.0);
    }

    #[test]
    fn test_decode_rejects_foreign_uris() {
        assert!(matches!(
            decode_wav_data_uri("data:audio/mpeg;base64,AAAA"),
            Err(Error::InvalidDataUri(_))
        ));
        assert!(matches!(
            decode_wav_data_uri("data:audio/wav;base64,@@@"),
            Err(Error::InvalidDataUri(_))
        ));
        assert!(matches!(
            decode_wav_data_uri("data:audio/wav;base64,AAAAAAAA"),
            Err(Error::Wav(_))
        ));
    }

    #[test]
    fn test_stereo_round_trip_reports_frames() {
        let format = PcmFormat::mono(44100)
            .with_channels(2)
            .with_bit_depth(BitDepth::I16);
        let uri = encode_pcm_to_wav_data_uri_with(&[0.25, -0.25, 0.0], format);
        let decoded = decode_wav_data_uri(&uri).unwrap();

        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.frames, 3);
        assert_eq!(decoded.samples.len(), 6);
        assert_eq!(decoded.bytes.len(), 44 + 3 * 4);
    }
}
