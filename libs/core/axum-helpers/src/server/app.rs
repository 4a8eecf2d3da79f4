use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

/// Wraps the API routes with the shared middleware stack.
///
/// - `apis` nested under `/api`; `extra` (e.g. health) merged at the root
/// - JSON 404 fallback
/// - request spans via `TraceLayer`
/// - security headers and response compression
/// - CORS when `server_config.cors_allowed_origins` is non-empty
pub fn create_router(apis: Router, extra: Router, server_config: &ServerConfig) -> io::Result<Router> {
    let router = Router::new()
        .nest("/api", apis)
        .merge(extra)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new());

    match create_cors_layer(&server_config.cors_allowed_origins)? {
        Some(cors) => {
            info!(origins = ?server_config.cors_allowed_origins, "CORS enabled");
            Ok(router.layer(cors))
        }
        None => Ok(router),
    }
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` within
/// `server_config.shutdown_timeout`.
pub async fn serve<F>(router: Router, server_config: &ServerConfig, cleanup: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let signal_handle = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.wait_for_signal().await })
    };

    let cleanup_handle = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator.wait().await;
            info!(?shutdown_timeout, "Running cleanup");
            if tokio::time::timeout(shutdown_timeout, cleanup).await.is_err() {
                warn!(?shutdown_timeout, "Cleanup timed out, forcing shutdown");
            }
        })
    };

    let graceful = {
        let coordinator = coordinator.clone();
        async move { coordinator.wait().await }
    };

    let result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(graceful)
        .await
        .inspect_err(|e| tracing::error!("Server error: {:?}", e));

    // Make sure cleanup runs even if the server stopped on its own.
    coordinator.shutdown();
    signal_handle.abort();
    cleanup_handle.await.ok();

    result
}
