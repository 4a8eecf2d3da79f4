use axum::{
    Json, Router,
    extract::{FromRef, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    Admins, AppError, AuditEvent, AuditOutcome, AuthorizationGuard, Authorized, IdPath, Readers,
    ValidatedJson, extract_ip_from_headers,
};
use std::sync::Arc;

use crate::error::ProductResult;
use crate::models::{ListParams, PageResult, Product, ProductInput, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Router state: the service plus the guard used by [`Authorized`].
pub struct ProductsState<R: ProductRepository> {
    service: Arc<ProductService<R>>,
    guard: AuthorizationGuard,
}

impl<R: ProductRepository> Clone for ProductsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            guard: self.guard.clone(),
        }
    }
}

impl<R: ProductRepository> FromRef<ProductsState<R>> for AuthorizationGuard {
    fn from_ref(state: &ProductsState<R>) -> Self {
        state.guard.clone()
    }
}

/// Create the products router
pub fn router<R: ProductRepository + 'static>(
    service: ProductService<R>,
    guard: AuthorizationGuard,
) -> Router {
    let state = ProductsState {
        service: Arc::new(service),
        guard,
    };

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

/// List products
///
/// GET /products?page=1&pageSize=10&sortBy=price&order=desc
async fn list_products<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    auth: Authorized<Readers>,
    Query(params): Query<ListParams>,
) -> ProductResult<Json<PageResult<Product>>> {
    tracing::info!(user_id = %auth.claims.sub, "Get Products is working.");
    let page = state.service.list(params).await?;
    Ok(Json(page))
}

/// Get a product by ID
///
/// GET /products/{id}
async fn get_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    _auth: Authorized<Readers>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    let product = state.service.get(id).await?;
    Ok(Json(product))
}

/// Create a new product
///
/// POST /products
async fn create_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    auth: Authorized<Admins>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<impl IntoResponse> {
    let product = state.service.create(input).await?;

    AuditEvent::by(
        &auth.claims,
        "product.create",
        Some(format!("product:{}", product.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product
///
/// PUT /products/{id}
async fn update_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    auth: Authorized<Admins>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    // Body validation happens in the service, after the id match check.
    let Json(replacement) = payload?;
    let result = state.service.update(id, replacement).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::by(&auth.claims, "product.update", Some(format!("product:{id}")), outcome)
        .with_ip(extract_ip_from_headers(&headers))
        .log();

    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
///
/// DELETE /products/{id}
async fn delete_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    auth: Authorized<Admins>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> ProductResult<StatusCode> {
    let result = state.service.delete(id).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::by(&auth.claims, "product.delete", Some(format!("product:{id}")), outcome)
        .with_ip(extract_ip_from_headers(&headers))
        .log();

    result?;
    Ok(StatusCode::NO_CONTENT)
}
