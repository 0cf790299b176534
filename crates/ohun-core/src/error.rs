//! Error types for the Ohun core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No text to speak")]
    EmptyText,

    #[error("No audio to transcribe")]
    EmptyAudio,

    #[error("Invalid or incomplete audio data received from speech service: {0}")]
    InvalidSpeechPayload(String),

    #[error("{field} not found in {service} response")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("HTTP error! status: {status}, message: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported PCM format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid audio data URI: {0}")]
    InvalidDataUri(String),

    #[error("WAV decoding error: {0}")]
    Wav(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Dictionary already contains an entry for '{0}'")]
    DuplicateEntry(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn missing(service: &'static str, field: &'static str) -> Self {
        Error::MissingField { service, field }
    }
}

impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        Error::Wav(e.to_string())
    }
}
