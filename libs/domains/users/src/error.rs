use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, TokenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    /// Unknown username and wrong password both end up here.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Store error: {0}")]
    Store(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<validator::ValidationErrors> for UserError {
    fn from(errors: validator::ValidationErrors) -> Self {
        UserError::Validation(errors.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameTaken(_) => AppError::Conflict("Username already exists".to_string()),
            UserError::InvalidCredentials => AppError::InvalidCredentials,
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(msg) => AppError::InternalServerError(msg),
            UserError::Token(e) => AppError::InternalServerError(e.to_string()),
            UserError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
