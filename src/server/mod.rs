//! HTTP server wiring: shared context, router construction and lifecycle.

use crate::config::ServerConfig;
use crate::resolve::PathResolver;
use crate::thumbs::Thumbnailer;
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub mod routes;

/// Shared application context. Everything in here is immutable for the
/// process lifetime; request handlers compute responses from it and the
/// filesystem alone.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub resolver: Arc<PathResolver>,
    /// Present-or-absent image capability; `None` declines thumbnails.
    pub thumbnailer: Option<Thumbnailer>,
}

impl AppContext {
    pub fn new(config: ServerConfig, thumbnailer: Option<Thumbnailer>) -> Self {
        let resolver = PathResolver::new(config.webroot.clone(), config.support_dir.clone());
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            thumbnailer,
        }
    }
}

/// Create the Axum router. Paths are arbitrary filesystem locations, so a
/// single fallback handler does the dispatch instead of a route table.
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .fallback(get(routes::serve_request))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind and run the server until a shutdown signal arrives.
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.domain, ctx.config.port);
    // A hostname-style domain is only for playlist URLs; bind all interfaces
    // in that case.
    let addr: SocketAddr = bind
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], ctx.config.port)));

    tracing::info!(
        "Serving {} on {}",
        ctx.config.webroot.display(),
        ctx.config.serve_url()
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, create_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

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
