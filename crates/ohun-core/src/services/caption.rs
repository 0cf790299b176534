//! Image captioning

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::{Error, Result};

const CAPTION_PATH: &str = "/api/caption";

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CaptionClient {
    api: ApiClient,
}

impl CaptionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Generate a caption for the image with the given identifier.
    pub async fn generate_caption(&self, image_identifier: &str) -> Result<String> {
        let query = [("image_identifier", Some(image_identifier.to_string()))];
        let response: Option<CaptionResponse> = self.api.get_json(CAPTION_PATH, &query).await?;

        response
            .and_then(|r| r.caption)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::missing("caption", "caption"))
    }
}
