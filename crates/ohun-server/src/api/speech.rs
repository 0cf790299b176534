//! Speech and translation endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::audio::AudioResponse;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Synthesize `text` and return it as a WAV data URI
pub async fn speak(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<AudioResponse>, ApiError> {
    info!("Speech request: {} chars", req.text.chars().count());
    let audio = state.speech.speak(&req.text).await?;
    Ok(Json(audio.into()))
}

pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    info!("Translation request: {} chars", req.text.chars().count());
    let translated_text = state.translation.translate_to_yoruba(&req.text).await?;
    Ok(Json(TranslateResponse { translated_text }))
}
