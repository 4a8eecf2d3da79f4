//! Application state management

use axum_helpers::{AuthorizationGuard, Clock, SystemClock, TokenIssuer};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Present when running against Postgres
    pub db: Option<DatabaseConnection>,
    pub issuer: Arc<TokenIssuer>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Config, db: Option<DatabaseConnection>) -> Self {
        let issuer = Arc::new(TokenIssuer::new(&config.jwt));
        Self {
            config,
            db,
            issuer,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn guard(&self) -> AuthorizationGuard {
        AuthorizationGuard::new(self.issuer.clone(), self.clock.clone())
    }
}
