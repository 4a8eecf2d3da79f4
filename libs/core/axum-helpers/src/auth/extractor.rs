//! Role-checked axum extractor.

use super::guard::{AuthorizationGuard, GuardError};
use super::jwt::Claims;
use super::role::Role;
use crate::audit::{AuditEvent, AuditOutcome, extract_ip_from_headers};
use crate::errors::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::marker::PhantomData;

/// Names the roles an endpoint accepts.
pub trait RolePolicy: Send + Sync + 'static {
    /// Empty means any authenticated principal.
    const ROLES: &'static [Role];
}

/// `User` or `Admin`.
pub struct Readers;

impl RolePolicy for Readers {
    const ROLES: &'static [Role] = &[Role::User, Role::Admin];
}

/// `Admin` only.
pub struct Admins;

impl RolePolicy for Admins {
    const ROLES: &'static [Role] = &[Role::Admin];
}

/// Any verified token.
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const ROLES: &'static [Role] = &[];
}

/// Claims of a caller that passed the guard for policy `P`.
///
/// Reads the `Authorization: Bearer <token>` header and runs the
/// [`AuthorizationGuard`] found in router state. Being a parts extractor,
/// it runs before any body extractor in the same handler.
///
/// ```ignore
/// async fn create(auth: Authorized<Admins>, ValidatedJson(input): ValidatedJson<ProductInput>) {
///     tracing::info!(user_id = %auth.claims.sub, "creating product");
/// }
/// ```
pub struct Authorized<P: RolePolicy> {
    pub claims: Claims,
    policy: PhantomData<fn() -> P>,
}

impl<P: RolePolicy> Authorized<P> {
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

/// Token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty())
}

impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    AuthorizationGuard: FromRef<S>,
    P: RolePolicy,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = AuthorizationGuard::from_ref(state);

        match guard.authorize(bearer_token(&parts.headers), P::ROLES) {
            Ok(claims) => Ok(Self {
                claims,
                policy: PhantomData,
            }),
            Err(err) => {
                if let GuardError::Forbidden { user_id, role } = &err {
                    AuditEvent::new(
                        Some(user_id.clone()),
                        "access.denied",
                        Some(parts.uri.path().to_string()),
                        AuditOutcome::Denied,
                    )
                    .with_ip(extract_ip_from_headers(&parts.headers))
                    .with_details(serde_json::json!({
                        "role": role,
                        "method": parts.method.as_str(),
                    }))
                    .log();
                }
                Err(AppError::from(err).into_response())
            }
        }
    }
}
