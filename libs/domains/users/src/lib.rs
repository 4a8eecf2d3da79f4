//! Users Domain
//!
//! Registration, login, and current-user lookup on top of the shared
//! token issuer and role guard from `axum-helpers`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /users/register, /users/login, /users/me
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ AuthService │  ← credential checks, token issuing
//! └──────┬──────┘
//!        │            PasswordHasher (argon2)
//! ┌──────▼──────┐
//! │ Repository  │  ← in-memory or Postgres (sea-orm)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let service = AuthService::new(
//!     InMemoryUserRepository::new(),
//!     PasswordHasher::new(),
//!     issuer.clone(),
//!     clock.clone(),
//! );
//! let router = handlers::router(service, guard);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{LoginRequest, NewUser, RegisterUser, TokenResponse, User, UserView};
pub use password::PasswordHasher;
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::AuthService;
