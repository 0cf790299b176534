//! Ohun Core - speech encoding and service clients for a Yoruba learning app
//!
//! The heart of the crate is the PCM-to-WAV encoder: float samples returned
//! by a text-to-speech service become a `data:audio/wav;base64,...` URI that
//! any URI-capable media player can play directly.
//!
//! Around it sit the pieces that feed and consume it:
//! - [`speech`] normalizes the speech service's response shapes
//! - [`services`] holds the translation, speech, caption, content and
//!   transcription clients, all built on [`client::ApiClient`]
//! - [`playback`] sequences speech playback over a media facility
//! - [`dictionary`] is the bundled picture dictionary
//!
//! # Example
//!
//! ```
//! use ohun_core::audio::encode_pcm_to_wav_data_uri;
//!
//! let uri = encode_pcm_to_wav_data_uri(&[0.0, 0.5, -0.5], 16000);
//! assert!(uri.starts_with("data:audio/wav;base64,"));
//! ```

pub mod audio;
pub mod client;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod playback;
pub mod services;
pub mod speech;

pub use audio::{
    decode_wav_data_uri, encode_pcm_to_wav_data_uri, encode_pcm_to_wav_data_uri_with,
    AudioEncoder, AudioFormat, BitDepth, EncodedAudio, PcmFormat,
};
pub use client::ApiClient;
pub use config::{ServerConfig, ServiceConfig};
pub use dictionary::{DictionaryImage, PictureDictionary};
pub use error::{Error, Result};
pub use playback::{PlaybackEvent, PlaybackFacility, PlayOutcome, SpeechPlayer, SpeechSource};
pub use services::{CaptionClient, ContentClient, SpeechClient, TranscriptionClient, TranslationClient};
pub use speech::PcmAudio;
