//! StockPilot assistant API — retail backend REST server.
//!
//! Exposes inventory forecasting, staff scoring, and a natural-language
//! assistant that routes free-text queries to one of those computations.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sp_api::auth::TokenAuthenticator;
use sp_api::config::ApiConfig;
use sp_api::embedding::FastEmbedder;
use sp_api::provider::MemoryProvider;
use sp_api::routes;
use sp_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sp-api starting");

    let config = ApiConfig::from_env();

    // Model download happens here on first run; subsequent starts hit the
    // local cache.
    let embedder = FastEmbedder::new(&config.embedding_model)?;

    tracing::warn!("using in-memory sample entities and token table");
    let state = AppState::new(
        Arc::new(MemoryProvider::with_sample_data()),
        Arc::new(embedder),
        Arc::new(TokenAuthenticator::with_sample_tokens()),
        config.index_path.clone(),
    );

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
