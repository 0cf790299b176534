//! Ohun gateway - HTTP API over the speech, translation and content services

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod settings;
mod state;

use settings::Settings;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ohun_server=debug,ohun_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ohun gateway");

    // Load configuration
    let settings = Settings::load()?;
    match settings.services.base_url() {
        Some(url) => info!("Backend: {}", url),
        None => warn!("Backend URL not configured; content routes will return 503"),
    }

    let state = AppState::new(&settings.services)?;
    let app = api::create_router(state, &settings.server);

    // Start server
    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
