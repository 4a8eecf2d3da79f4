//! Router assembly, health endpoint, and graceful shutdown.
//!
//! ```ignore
//! let router = create_router(api_routes, health_router(app_info!()), &config.server)?;
//! serve(router, &config.server, async move { db.close().await.ok(); }).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_router, serve};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
