//! Clients for the remote translation, speech, caption and content services

mod caption;
mod content;
mod transcription;
mod translation;
mod tts;

pub use caption::CaptionClient;
pub use content::{CategoryInfo, ContentClient, ImageMetadata, RecordId, Sentence};
pub use transcription::{TranscriptionClient, DEFAULT_MIME_TYPE};
pub use translation::TranslationClient;
pub use tts::SpeechClient;
