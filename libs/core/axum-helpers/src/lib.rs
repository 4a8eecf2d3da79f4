//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! - **[`auth`]**: token issuing/verification, role guard, `Authorized<P>` extractor
//! - **[`server`]**: router assembly, health endpoint, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the JSON error envelope
//! - **[`extractors`]**: `ValidatedJson`, `IdPath`
//! - **[`audit`]**: audit events on the `audit` tracing target

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AccessToken, Admins, AnyRole, AuthorizationGuard, Authorized, Claims, Clock, GuardError,
    JwtConfig, ManualClock, Readers, Role, RolePolicy, SystemClock, TokenError, TokenIssuer,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_router, health_router,
    run_health_checks, serve, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
