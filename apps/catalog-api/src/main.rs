//! Catalog API - users and products over REST

use axum_helpers::{create_router, serve};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres;
use database::RetryConfig;
use migration::Migrator;
use tracing::{info, warn};

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = match &config.database {
        Some(pg) => {
            info!(url = %pg.redacted_url(), "Connecting to PostgreSQL");
            let db = postgres::connect_with_retry(pg, &RetryConfig::default()).await?;
            postgres::run_migrations::<Migrator>(&db).await?;
            Some(db)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage; data is lost on exit");
            None
        }
    };

    let state = AppState::new(config, db);

    let router = create_router(
        api::routes(&state),
        api::health::router(&state),
        &state.config.server,
    )?;

    info!(
        name = state.config.app.name,
        version = state.config.app.version,
        address = %state.config.server.address(),
        "Starting Catalog API"
    );

    let server_config = state.config.server.clone();
    let db = state.db.clone();
    serve(router, &server_config, async move {
        if let Some(db) = db {
            info!("Shutting down: closing PostgreSQL pool");
            if let Err(e) = db.close().await {
                warn!(error = %e, "Failed to close PostgreSQL pool cleanly");
            }
        }
    })
    .await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
