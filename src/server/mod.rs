use crate::config::Config;
use crate::hub::{ws, LiveHub};
use crate::store::SegmentStore;
use crate::watch::DirWatcher;
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub mod routes_media;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<SegmentStore>,
    pub hub: Arc<LiveHub>,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes.
///
/// Everything that is not `/health` or the `/ws` upgrade falls through to
/// the media handler, which serves files out of the media directory.
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(ws::ws_handler))
        .fallback(routes_media::serve_media)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server and the directory watcher.
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let store = Arc::new(SegmentStore::new(config.media.dir.clone()));
    let hub = Arc::new(LiveHub::new());

    // Without the watch no viewer ever learns of new segments, so a
    // failure here aborts startup instead of limping along.
    let mut watcher = DirWatcher::new(config.media.clone(), hub.clone());
    watcher.start()?;

    let ctx = AppContext {
        store,
        hub: hub.clone(),
        config: Arc::new(config),
    };
    let app = create_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint at ws://{}/ws", addr);
    tracing::info!("Access the stream at http://{}/index.m3u8", addr);

    // Viewer sockets are persistent; close them as part of the shutdown
    // signal so graceful shutdown is not held open by idle viewers.
    let shutdown_hub = hub.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown_hub.shutdown();
        })
        .await?;

    watcher.stop();
    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
