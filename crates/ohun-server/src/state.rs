//! Application state management

use ohun_core::{
    ApiClient, CaptionClient, ContentClient, PictureDictionary, ServiceConfig, SpeechClient,
    TranslationClient,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub translation: TranslationClient,
    pub speech: SpeechClient,
    pub captions: CaptionClient,
    pub content: ContentClient,
    pub dictionary: Arc<RwLock<PictureDictionary>>,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> ohun_core::Result<Self> {
        let api = ApiClient::new(config.clone())?;
        Ok(Self {
            translation: TranslationClient::new(api.clone()),
            speech: SpeechClient::new(api.clone()),
            captions: CaptionClient::new(api.clone()),
            content: ContentClient::new(api),
            dictionary: Arc::new(RwLock::new(PictureDictionary::seeded())),
        })
    }
}
