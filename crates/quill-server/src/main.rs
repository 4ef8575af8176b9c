use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use quill_core::ScraperConfig;
use quill_server::config::ServerConfig;
use quill_server::routes;
use quill_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("quill=info".parse()?))
        .with_target(false)
        .init();

    let scraper = ScraperConfig::from_env()?;
    let server = ServerConfig::from_env()?;
    let addr = format!("0.0.0.0:{}", server.port);

    tracing::info!(base_url = %scraper.base_url, max_pages = server.max_pages, "Scraper configured");
    let state = Arc::new(AppState::new(scraper, &server)?);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
