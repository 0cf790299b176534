//! Caption, dictionary and content listing endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use ohun_core::services::{CategoryInfo, ImageMetadata, Sentence};
use ohun_core::DictionaryImage;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CaptionQuery {
    pub image_identifier: String,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub caption: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Serialize)]
pub struct DictionaryPage {
    pub total: usize,
    pub items: Vec<DictionaryImage>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub sentence: Vec<CategoryInfo>,
    pub image: Vec<CategoryInfo>,
}

pub async fn caption(
    State(state): State<AppState>,
    Query(query): Query<CaptionQuery>,
) -> Result<Json<CaptionResponse>, ApiError> {
    if query.image_identifier.trim().is_empty() {
        return Err(ApiError::bad_request("image_identifier must not be empty"));
    }
    let caption = state
        .captions
        .generate_caption(&query.image_identifier)
        .await?;
    Ok(Json(CaptionResponse { caption }))
}

/// Page through the bundled picture dictionary
pub async fn dictionary(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<DictionaryPage> {
    let dictionary = state.dictionary.read().await;
    Json(DictionaryPage {
        total: dictionary.count(),
        items: dictionary
            .page(query.limit as usize, query.offset as usize)
            .to_vec(),
    })
}

pub async fn images(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ImageMetadata>>, ApiError> {
    let images = state
        .content
        .image_metadata(query.limit, query.offset, query.category.as_deref())
        .await?;
    Ok(Json(images))
}

pub async fn sentences(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Sentence>>, ApiError> {
    let sentences = state
        .content
        .sentences(query.limit, query.offset, query.category.as_deref())
        .await?;
    Ok(Json(sentences))
}

/// Sentence and image categories, fetched concurrently
pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let (sentence, image) = futures::try_join!(
        state.content.sentence_categories(),
        state.content.image_categories()
    )?;
    Ok(Json(CategoriesResponse { sentence, image }))
}
