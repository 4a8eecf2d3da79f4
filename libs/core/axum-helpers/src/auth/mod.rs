//! Authentication and role-based authorization.
//!
//! - [`TokenIssuer`] signs and verifies HS256 access tokens.
//! - [`AuthorizationGuard`] turns a bearer token into [`Claims`] and checks
//!   the caller's [`Role`] against the set an operation requires.
//! - [`Authorized`] runs the guard as an axum extractor, so the check happens
//!   before the handler reads the request body.
//! - [`Clock`] is injected so token expiry can be tested deterministically.
//!
//! ```ignore
//! let config = JwtConfig::from_env()?;
//! let issuer = Arc::new(TokenIssuer::new(&config));
//! let guard = AuthorizationGuard::new(issuer.clone(), Arc::new(SystemClock));
//!
//! async fn delete(auth: Authorized<Admins>, IdPath(id): IdPath) { /* ... */ }
//! ```

pub mod clock;
pub mod config;
pub mod extractor;
pub mod guard;
pub mod jwt;
pub mod role;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::JwtConfig;
pub use extractor::{Admins, AnyRole, Authorized, Readers, RolePolicy, bearer_token};
pub use guard::{AuthorizationGuard, GuardError};
pub use jwt::{AccessToken, Claims, TokenError, TokenIssuer};
pub use role::Role;
