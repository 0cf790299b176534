//! HTTP routes

mod audio;
mod content;
mod speech;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use ohun_core::ServerConfig;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/v1/audio/encode", post(audio::encode))
        .route("/v1/speech", post(speech::speak))
        .route("/v1/translate", post(speech::translate))
        .route("/v1/caption", get(content::caption))
        .route("/v1/dictionary", get(content::dictionary))
        .route("/v1/images", get(content::images))
        .route("/v1/sentences", get(content::sentences))
        .route("/v1/categories", get(content::categories))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if server.cors_enabled {
        router.layer(cors_layer(server))
    } else {
        router
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
