//! Configuration for the Catalog API

use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    /// `None` when `DATABASE_URL` is unset: repositories are in-memory
    pub database: Option<PostgresConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;

        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            jwt,
            database,
        })
    }
}
