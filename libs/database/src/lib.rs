//! PostgreSQL connection management: env-driven pool config, connect with
//! exponential backoff, migrations, and a ping for health checks.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_with_retry(&config, RetryConfig::default()).await?;
//! postgres::run_migrations::<migration::Migrator>(&db).await?;
//! ```

pub mod error;
pub mod postgres;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry_with_backoff};
