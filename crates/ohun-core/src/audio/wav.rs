//! Canonical RIFF/WAVE writer for integer PCM
//!
//! The header is always the 44-byte `RIFF` / `fmt ` / `data` layout with
//! `AudioFormat = 1`. It is written by hand rather than through
//! `hound::WavWriter`, which switches to `WAVE_FORMAT_EXTENSIBLE` above 16
//! bits or 2 channels and so breaks the fixed 44-byte layout.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Size of the canonical PCM header in bytes
pub const WAV_HEADER_LEN: usize = 44;

/// Integer PCM sample depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit, stored unsigned with a 128 offset
    U8,
    /// 16-bit signed (default)
    #[default]
    I16,
    /// 24-bit signed, packed in 3 bytes
    I24,
    /// 32-bit signed
    I32,
}

impl BitDepth {
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::U8),
            16 => Some(Self::I16),
            24 => Some(Self::I24),
            32 => Some(Self::I32),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::U8 => 8,
            Self::I16 => 16,
            Self::I24 => 24,
            Self::I32 => 32,
        }
    }

    pub fn bytes(self) -> u16 {
        self.bits() / 8
    }

    /// Quantize a normalized sample into this depth's signed range.
    ///
    /// The input is clamped to [-1.0, 1.0]. Negative values scale by
    /// `2^(n-1)` and non-negative values by `2^(n-1) - 1`, so -1.0 and 1.0
    /// land exactly on the type's minimum and maximum. NaN becomes 0.
    pub fn quantize(self, sample: f32) -> i32 {
        let full_scale = f64::from(1u32 << (self.bits() - 1));
        let s = f64::from(sample).clamp(-1.0, 1.0);
        let scaled = if s < 0.0 {
            s * full_scale
        } else {
            s * (full_scale - 1.0)
        };
        // `as` maps NaN to 0
        scaled.round() as i64 as i32
    }

    fn write_sample(self, value: i32, out: &mut Vec<u8>) {
        match self {
            Self::U8 => out.push((value + 128) as u8),
            Self::I16 => out.extend_from_slice(&(value as i16).to_le_bytes()),
            Self::I24 => out.extend_from_slice(&value.to_le_bytes()[..3]),
            Self::I32 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

/// Quantize a normalized sample to signed 16-bit PCM.
pub fn quantize_i16(sample: f32) -> i16 {
    BitDepth::I16.quantize(sample) as i16
}

/// Layout of the PCM stream described by a WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Samples per second
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Bits per sample
    pub bit_depth: BitDepth,
}

impl PcmFormat {
    /// Mono 16-bit PCM at the given rate
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bit_depth: BitDepth::I16,
        }
    }

    /// A format whose frame fits the 16-bit BlockAlign field
    pub fn checked(sample_rate: u32, channels: u16, bit_depth: BitDepth) -> Result<Self> {
        let format = Self {
            sample_rate,
            channels,
            bit_depth,
        };
        if channels > format.max_channels() {
            return Err(Error::UnsupportedFormat(format!(
                "{} channels of {}-bit audio exceed the {}-byte frame limit",
                channels,
                bit_depth.bits(),
                u16::MAX
            )));
        }
        Ok(format)
    }

    /// Largest channel count whose frame fits in BlockAlign
    pub fn max_channels(&self) -> u16 {
        u16::MAX / self.bit_depth.bytes()
    }

    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Bytes per frame (`channels * bytes_per_sample`)
    pub fn block_align(&self) -> u32 {
        u32::from(self.channels) * u32::from(self.bit_depth.bytes())
    }

    /// Bytes per second (`sample_rate * block_align`)
    pub fn byte_rate(&self) -> u64 {
        u64::from(self.sample_rate) * u64::from(self.block_align())
    }

    /// Payload size for `sample_count` input samples
    pub fn data_len(&self, sample_count: usize) -> usize {
        sample_count.saturating_mul(self.block_align() as usize)
    }

    fn clamp_channels(self) -> Self {
        let max = self.max_channels();
        if self.channels <= max {
            return self;
        }
        warn!(
            "{} channels exceed the {}-bit frame limit, writing {}",
            self.channels,
            self.bit_depth.bits(),
            max
        );
        self.with_channels(max)
    }
}

/// Encode normalized mono samples into a complete WAV file.
///
/// Each input sample is one frame; with more than one channel the quantized
/// value is repeated across every channel of the frame. A channel count
/// whose frame would overflow BlockAlign is clamped to
/// [`PcmFormat::max_channels`]; use [`PcmFormat::checked`] to reject it
/// instead. Size fields that do not fit in a RIFF header saturate at their
/// maximum.
pub fn encode_wav(samples: &[f32], format: PcmFormat) -> Vec<u8> {
    let format = format.clamp_channels();
    let data_len = format.data_len(samples.len());
    let data_size = saturate_u32(data_len as u64);

    let mut buffer = Vec::with_capacity(WAV_HEADER_LEN + data_len);

    // RIFF chunk descriptor
    buffer.extend_from_slice(b"RIFF");
    buffer.extend_from_slice(&data_size.saturating_add(36).to_le_bytes());
    buffer.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    buffer.extend_from_slice(b"fmt ");
    buffer.extend_from_slice(&16u32.to_le_bytes());
    buffer.extend_from_slice(&1u16.to_le_bytes());
    buffer.extend_from_slice(&format.channels.to_le_bytes());
    buffer.extend_from_slice(&format.sample_rate.to_le_bytes());
    buffer.extend_from_slice(&saturate_u32(format.byte_rate()).to_le_bytes());
    buffer.extend_from_slice(&(format.block_align() as u16).to_le_bytes());
    buffer.extend_from_slice(&format.bit_depth.bits().to_le_bytes());

    // data sub-chunk
    buffer.extend_from_slice(b"data");
    buffer.extend_from_slice(&data_size.to_le_bytes());

    for &sample in samples {
        let value = format.bit_depth.quantize(sample);
        for _ in 0..format.channels {
            format.bit_depth.write_sample(value, &mut buffer);
        }
    }

    debug!(
        "Encoded {} samples to WAV ({} Hz, {} ch, {}-bit, {} bytes)",
        samples.len(),
        format.sample_rate,
        format.channels,
        format.bit_depth.bits(),
        buffer.len()
    );
    buffer
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
