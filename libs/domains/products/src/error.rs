use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Path id {path} does not match body id {body}")]
    IdMismatch { path: i32, body: i32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The record changed between read and write but still exists. Retryable.
    #[error("Product {0} was modified concurrently")]
    Conflict(i32),

    #[error("Store error: {0}")]
    Store(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Failures reported by a [`crate::repository::ProductRepository`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The write lost a race with another writer.
    #[error("write conflict")]
    Conflict,

    /// The targeted row does not exist (anymore).
    #[error("record missing")]
    Missing,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        ProductError::Store(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ProductError::Validation(errors.to_string())
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {id} not found")),
            ProductError::IdMismatch { path, body } => AppError::BadRequestWithCode {
                code: ErrorCode::IdMismatch,
                message: format!("Path id {path} does not match body id {body}"),
                details: Some(serde_json::json!({ "pathId": path, "bodyId": body })),
            },
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Conflict(id) => {
                AppError::Conflict(format!("Product {id} was modified concurrently, retry"))
            }
            ProductError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
