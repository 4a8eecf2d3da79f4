use super::clock::Clock;
use super::jwt::{Claims, TokenError, TokenIssuer};
use super::role::Role;
use crate::errors::AppError;
use std::sync::Arc;
use thiserror::Error;

/// Why a request was turned away by [`AuthorizationGuard`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// No token, or a token that failed verification. `None` means no token was sent.
    #[error("authentication required")]
    Unauthenticated(Option<TokenError>),

    #[error("role {role} is not permitted")]
    Forbidden { user_id: String, role: Role },
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        match err {
            // Every token failure looks the same to the caller.
            GuardError::Unauthenticated(_) => {
                AppError::Unauthorized("Authentication required".to_string())
            }
            GuardError::Forbidden { .. } => {
                AppError::Forbidden("Insufficient permissions".to_string())
            }
        }
    }
}

/// Resolves bearer tokens to claims and enforces per-operation role sets.
#[derive(Clone)]
pub struct AuthorizationGuard {
    issuer: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl AuthorizationGuard {
    pub fn new(issuer: Arc<TokenIssuer>, clock: Arc<dyn Clock>) -> Self {
        Self { issuer, clock }
    }

    /// Verifies `bearer` and checks its role against `required`.
    ///
    /// An empty `required` set admits any authenticated principal; the
    /// claims are still returned.
    pub fn authorize(&self, bearer: Option<&str>, required: &[Role]) -> Result<Claims, GuardError> {
        let Some(token) = bearer else {
            tracing::debug!("No bearer token on request");
            return Err(GuardError::Unauthenticated(None));
        };

        let claims = match self.issuer.verify(token, self.clock.now()) {
            Ok(claims) => claims,
            Err(err) => {
                match &err {
                    TokenError::Expired => tracing::info!("Rejected expired token"),
                    TokenError::SignatureInvalid => {
                        tracing::warn!("Rejected token with invalid signature")
                    }
                    other => tracing::info!(error = %other, "Rejected token"),
                }
                return Err(GuardError::Unauthenticated(Some(err)));
            }
        };

        if !required.is_empty() && !required.contains(&claims.role) {
            tracing::info!(
                user_id = %claims.sub,
                role = %claims.role,
                ?required,
                "Role not permitted"
            );
            return Err(GuardError::Forbidden {
                user_id: claims.sub,
                role: claims.role,
            });
        }

        Ok(claims)
    }
}
