//! Normalization of text-to-speech service responses
//!
//! The speech service answers either with a `[samples, sample_rate]` pair or
//! with an object carrying the samples under `audio`, `audio_data` or `data`
//! and the rate under `sample_rate` or `rate`. Both shapes are resolved here,
//! once, into a [`PcmAudio`] so the encoder never sees the raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::audio::{encode_pcm_to_wav_data_uri, AudioEncoder, EncodedAudio};
use crate::error::{Error, Result};

const SAMPLE_KEYS: [&str; 3] = ["audio", "audio_data", "data"];
const RATE_KEYS: [&str; 2] = ["sample_rate", "rate"];

/// Shape of a speech service response
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechPayload<'a> {
    /// `[samples, sample_rate]`
    Pair(&'a Value, &'a Value),
    /// Object with aliased keys; either side may be absent
    Fields {
        samples: Option<&'a Value>,
        sample_rate: Option<&'a Value>,
    },
}

impl<'a> SpeechPayload<'a> {
    pub fn classify(value: &'a Value) -> Result<Self> {
        match value {
            Value::Array(items) if items.len() == 2 => Ok(Self::Pair(&items[0], &items[1])),
            Value::Object(map) => Ok(Self::Fields {
                samples: first_truthy(map, &SAMPLE_KEYS),
                sample_rate: first_truthy(map, &RATE_KEYS),
            }),
            Value::Array(items) => Err(Error::InvalidSpeechPayload(format!(
                "expected a [samples, sample_rate] pair, got an array of {} elements",
                items.len()
            ))),
            other => Err(Error::InvalidSpeechPayload(format!(
                "expected an array or object, got {}",
                json_type(other)
            ))),
        }
    }

    fn parts(&self) -> (Option<&'a Value>, Option<&'a Value>) {
        match *self {
            Self::Pair(samples, rate) => (Some(samples), Some(rate)),
            Self::Fields {
                samples,
                sample_rate,
            } => (samples, sample_rate),
        }
    }
}

/// Mono float samples with their sample rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcmAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Normalize a parsed speech service response.
    pub fn from_json(value: &Value) -> Result<Self> {
        let (samples, rate) = SpeechPayload::classify(value)?.parts();

        let (samples, rate) = match (samples.and_then(Value::as_array), rate) {
            (Some(samples), Some(rate)) if rate.is_number() => (samples, rate),
            (samples_array, _) => {
                let samples_desc = match samples_array {
                    Some(items) => format!("array of length {}", items.len()),
                    None => samples.map_or("missing".to_string(), |v| json_type(v).to_string()),
                };
                let rate_desc = rate.map_or("missing".to_string(), Value::to_string);
                return Err(Error::InvalidSpeechPayload(format!(
                    "got samples ({}) and sample rate ({})",
                    samples_desc, rate_desc
                )));
            }
        };

        let samples = samples
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().map(|s| s as f32).ok_or_else(|| {
                    Error::InvalidSpeechPayload(format!(
                        "sample {} is {}, not a number",
                        i,
                        json_type(v)
                    ))
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        Ok(Self::new(samples, parse_sample_rate(rate)?))
    }

    /// Encode as a mono 16-bit WAV data URI.
    pub fn to_data_uri(&self) -> String {
        encode_pcm_to_wav_data_uri(&self.samples, self.sample_rate)
    }

    /// Encode as a mono 16-bit WAV data URI with playback metadata.
    pub fn encode(&self) -> EncodedAudio {
        AudioEncoder::new(self.sample_rate, 1).data_uri(&self.samples)
    }
}

fn parse_sample_rate(value: &Value) -> Result<u32> {
    if let Some(rate) = value.as_u64() {
        return u32::try_from(rate)
            .map_err(|_| Error::InvalidSpeechPayload(format!("sample rate {} out of range", rate)));
    }
    match value.as_f64() {
        Some(rate) if rate.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&rate) => {
            Ok(rate as u32)
        }
        _ => Err(Error::InvalidSpeechPayload(format!(
            "sample rate {} is not a non-negative integer",
            value
        ))),
    }
}

/// First key whose value is present and not falsy (null, false, 0 or "").
fn first_truthy<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pair_shape() {
        let audio = PcmAudio::from_json(&json!([[0.0, 0.5, -0.5], 16000])).unwrap();
        assert_eq!(audio.samples, vec![0.0, 0.5, -0.5]);
        assert_eq!(audio.sample_rate, 16000);
    }

    #[test]
    fn test_object_key_aliases() {
        let audio = PcmAudio::from_json(&json!({"audio": [0.1], "sample_rate": 22050})).unwrap();
        assert_eq!(audio.sample_rate, 22050);

        let audio = PcmAudio::from_json(&json!({"audio_data": [0.1, 0.2], "rate": 24000})).unwrap();
        assert_eq!(audio.samples.len(), 2);
        assert_eq!(audio.sample_rate, 24000);

        let audio = PcmAudio::from_json(&json!({"data": [], "rate": 8000.0})).unwrap();
        assert!(audio.samples.is_empty());
        assert_eq!(audio.sample_rate, 8000);
    }

    #[test]
    fn test_falsy_values_fall_through_to_next_key() {
        let audio = PcmAudio::from_json(&json!({
            "audio": null,
            "data": [0.25],
            "sample_rate": 0,
            "rate": 16000
        }))
        .unwrap();
        assert_eq!(audio.samples, vec![0.25]);
        assert_eq!(audio.sample_rate, 16000);
    }

    #[test]
    fn test_empty_array_is_a_present_sample_buffer() {
        let audio = PcmAudio::from_json(&json!({"audio": [], "data": [1.0], "rate": 16000})).unwrap();
        assert!(audio.samples.is_empty());
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        for payload in [
            json!("audio"),
            json!(42),
            json!(null),
            json!([[0.0], 16000, "extra"]),
            json!({"audio": "not-an-array", "sample_rate": 16000}),
            json!({"audio": [0.0]}),
            json!({"audio": [0.0], "sample_rate": "16000"}),
            json!([[0.0], "16000"]),
            json!([0.0, 16000]),
        ] {
            assert!(
                matches!(PcmAudio::from_json(&payload), Err(Error::InvalidSpeechPayload(_))),
                "accepted {}",
                payload
            );
        }
    }

    #[test]
    fn test_rejects_non_numeric_samples_and_bad_rates() {
        let err = PcmAudio::from_json(&json!([[0.0, "x"], 16000])).unwrap_err();
        assert!(err.to_string().contains("sample 1"));

        for rate in [json!(-1), json!(16000.5), json!(1e12)] {
            assert!(PcmAudio::from_json(&json!([[0.0], rate])).is_err());
        }
    }

    #[test]
    fn test_error_describes_what_was_received() {
        let err = PcmAudio::from_json(&json!({"audio": [0.0, 0.1], "sample_rate": null})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("array of length 2"), "{}", message);
        assert!(message.contains("missing"), "{}", message);
    }

    #[test]
    fn test_encode_uses_mono_sixteen_bit() {
        let audio = PcmAudio::new(vec![0.0, 0.5, -0.5, 1.0, -1.0], 16000);
        let encoded = audio.encode();
        assert_eq!(encoded.data_uri, audio.to_data_uri());
        assert_eq!(encoded.sample_count, 5);
    }
}
