use axum::{
    Json, Router,
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AnyRole, AuditEvent, AuditOutcome, AuthorizationGuard, Authorized, ValidatedJson,
    extract_ip_from_headers, extract_user_agent,
};
use std::sync::Arc;

use crate::error::UserResult;
use crate::models::{LoginRequest, RegisterUser, TokenResponse, UserView};
use crate::repository::UserRepository;
use crate::service::AuthService;

/// Router state: the service plus the guard used by [`Authorized`].
pub struct UsersState<R: UserRepository> {
    service: Arc<AuthService<R>>,
    guard: AuthorizationGuard,
}

impl<R: UserRepository> Clone for UsersState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            guard: self.guard.clone(),
        }
    }
}

impl<R: UserRepository> FromRef<UsersState<R>> for AuthorizationGuard {
    fn from_ref(state: &UsersState<R>) -> Self {
        state.guard.clone()
    }
}

/// Create the users router
pub fn router<R: UserRepository + 'static>(
    service: AuthService<R>,
    guard: AuthorizationGuard,
) -> Router {
    let state = UsersState {
        service: Arc::new(service),
        guard,
    };

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(state)
}

/// Register a new user
///
/// POST /users/register
async fn register<R: UserRepository>(
    State(state): State<UsersState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<impl IntoResponse> {
    let username = input.username.clone();
    let result = state.service.register(input).await;

    let outcome = match &result {
        Ok(_) => AuditOutcome::Success,
        Err(_) => AuditOutcome::Failure,
    };
    AuditEvent::new(None, "user.register", Some(format!("user:{username}")), outcome)
        .with_ip(extract_ip_from_headers(&headers))
        .with_user_agent(extract_user_agent(&headers))
        .log();

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Exchange credentials for an access token
///
/// POST /users/login
async fn login<R: UserRepository>(
    State(state): State<UsersState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    let username = input.username.clone();
    let result = state.service.login(input).await;

    let outcome = match &result {
        Ok(_) => AuditOutcome::Success,
        Err(_) => AuditOutcome::Failure,
    };
    AuditEvent::new(None, "user.login", Some(format!("user:{username}")), outcome)
        .with_ip(extract_ip_from_headers(&headers))
        .with_user_agent(extract_user_agent(&headers))
        .log();

    Ok(Json(TokenResponse::from(result?)))
}

/// The authenticated caller's profile
///
/// GET /users/me
async fn me<R: UserRepository>(
    State(state): State<UsersState<R>>,
    auth: Authorized<AnyRole>,
) -> UserResult<Json<UserView>> {
    let user = state.service.current_user(&auth.claims).await?;
    Ok(Json(user))
}
