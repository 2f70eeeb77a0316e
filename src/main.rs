use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    build_recommender,
    config::Config,
    routes::{create_router, AppState},
    services::SharedRecommender,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Catalog and matrix are loaded exactly once; a failure here stops startup.
    let shared = SharedRecommender::new();
    let recommender = shared
        .get_or_init(|| build_recommender(&config))
        .await
        .context("Failed to initialize recommender")?;

    tracing::info!(
        items = recommender.catalog().len(),
        top_k = config.top_k,
        enrichment_mode = ?config.enrichment_mode,
        "Recommender ready"
    );

    let app = create_router(AppState::new(recommender));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
