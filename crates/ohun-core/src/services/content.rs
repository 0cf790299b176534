//! Image metadata, sentences and categories from the content backend

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Result;

/// Record identifier; the backend uses both numeric and string ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

/// Image metadata with its resolved download URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub image_key: String,
    pub english_caption: String,
    pub asset_filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Metadata as sent by the backend, before validation. Fields are raw
/// JSON; only `image_key` and `asset_filename` decide whether a record is kept.
#[derive(Debug, Deserialize)]
struct RawImageMetadata {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    image_key: Option<Value>,
    #[serde(default)]
    english_caption: Option<Value>,
    #[serde(default)]
    asset_filename: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
}

impl RawImageMetadata {
    fn into_valid(self) -> Option<ImageMetadata> {
        let image_key = non_blank_string(self.image_key)?;
        let asset_filename = non_blank_string(self.asset_filename)?;
        if asset_filename.trim().eq_ignore_ascii_case("undefined") {
            return None;
        }
        Some(ImageMetadata {
            id: self.id.and_then(|id| serde_json::from_value(id).ok()),
            image_key,
            english_caption: scalar_string(self.english_caption).unwrap_or_default(),
            asset_filename,
            url: None,
            category: scalar_string(self.category),
        })
    }
}

/// Strings pass through; numbers and booleans are rendered as text
fn scalar_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_blank_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: RecordId,
    pub sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A filterable category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Raw value used for filtering (e.g. `common_phr`)
    pub value: String,
    /// Human-readable name (e.g. `Common Phrases`)
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    api: ApiClient,
}

impl ContentClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch a page of image metadata, dropping incomplete records and
    /// resolving each image's URL on the backend.
    pub async fn image_metadata(
        &self,
        limit: u32,
        offset: u32,
        category: Option<&str>,
    ) -> Result<Vec<ImageMetadata>> {
        let query = page_query(limit, offset, category);
        let raw: Vec<RawImageMetadata> = self
            .api
            .get_json("/api/image_metadata", &query)
            .await?
            .unwrap_or_default();
        let received = raw.len();

        let mut images = Vec::with_capacity(received);
        for mut image in raw.into_iter().filter_map(RawImageMetadata::into_valid) {
            let url = self
                .api
                .asset_url(&["api", "images", image.asset_filename.as_str()])?;
            image.url = Some(url.to_string());
            images.push(image);
        }

        if images.len() < received {
            warn!(
                "Dropped {} image metadata records with missing keys or filenames",
                received - images.len()
            );
        }
        debug!("Received {} image metadata records", images.len());
        Ok(images)
    }

    pub async fn sentences(
        &self,
        limit: u32,
        offset: u32,
        category: Option<&str>,
    ) -> Result<Vec<Sentence>> {
        let query = page_query(limit, offset, category);
        Ok(self
            .api
            .get_json("/api/sentences", &query)
            .await?
            .unwrap_or_default())
    }

    pub async fn sentence_categories(&self) -> Result<Vec<CategoryInfo>> {
        Ok(self
            .api
            .get_json("/api/sentence-categories", &[])
            .await?
            .unwrap_or_default())
    }

    pub async fn image_categories(&self) -> Result<Vec<CategoryInfo>> {
        Ok(self
            .api
            .get_json("/api/image-categories", &[])
            .await?
            .unwrap_or_default())
    }
}

fn page_query(limit: u32, offset: u32, category: Option<&str>) -> [(&'static str, Option<String>); 3] {
    [
        ("limit", Some(limit.to_string())),
        ("offset", Some(offset.to_string())),
        ("filter_term", category.map(str::to_string)),
    ]
}
