//! English to Yoruba translation

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct TranslationRequest<'a> {
    text: &'a str,
    source_lang: &'static str,
    target_lang: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    translated_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranslationClient {
    api: ApiClient,
}

impl TranslationClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Translate English text to Yoruba. Blank input translates to "".
    pub async fn translate_to_yoruba(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let endpoint = &self.api.config().translate_endpoint;
        info!("Translating {} chars to Yoruba via {}", text.len(), endpoint);

        let request = TranslationRequest {
            text,
            source_lang: "EN",
            target_lang: "YO",
        };
        let response: Option<TranslationResponse> = self.api.post_json(endpoint, &request).await?;

        response
            .and_then(|r| r.translated_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing("translation", "translated_text"))
    }
}
