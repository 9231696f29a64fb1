// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use rectifier_live_sync::application::detail_view::DetailView;
use rectifier_live_sync::application::directory_view::DirectoryView;
use rectifier_live_sync::application::site_service::SiteService;
use rectifier_live_sync::application::telemetry_client::TelemetryClient;
use rectifier_live_sync::infrastructure::config::load_monitor_config;
use rectifier_live_sync::infrastructure::rest_client::RestTelemetryClient;
use rectifier_live_sync::presentation::app_state::AppState;
use rectifier_live_sync::presentation::router::router;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_monitor_config()?;

    // Create telemetry client (infrastructure layer)
    let client: Arc<dyn TelemetryClient> = Arc::new(RestTelemetryClient::new(
        config.api.base_url.clone(),
        config.request_timeout(),
    )?);
    tracing::info!("Polling telemetry API at {}", config.api.base_url);

    // Create views (application layer)
    let poll = config.poll_config();
    let state = Arc::new(AppState {
        directory: DirectoryView::activate(client.clone(), poll),
        detail: Mutex::new(DetailView::new(client.clone(), poll)),
        site_service: SiteService::new(client),
        shutdown: CancellationToken::new(),
    });

    // Build router (presentation layer)
    let app = router(state.clone()).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting rectifier-live-sync on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal(state.shutdown.clone()))
        .await?;

    state.detail.lock().await.unbind();
    state.directory.teardown();

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
    // Open event streams hold their connections until this fires.
    shutdown.cancel();
}
