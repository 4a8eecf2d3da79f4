//! API routes module

pub mod health;

use axum::Router;
use domain_products::{InMemoryProductRepository, PgProductRepository, ProductService};
use domain_users::{AuthService, InMemoryUserRepository, PasswordHasher, PgUserRepository};

use crate::state::AppState;

/// `/users` and `/products`, to be nested under `/api`
pub fn routes(state: &AppState) -> Router {
    let guard = state.guard();
    let hasher = PasswordHasher::new();

    let (users, products) = match &state.db {
        Some(db) => (
            domain_users::handlers::router(
                AuthService::new(
                    PgUserRepository::new(db.clone()),
                    hasher,
                    state.issuer.clone(),
                    state.clock.clone(),
                ),
                guard.clone(),
            ),
            domain_products::handlers::router(
                ProductService::new(PgProductRepository::new(db.clone())),
                guard,
            ),
        ),
        None => (
            domain_users::handlers::router(
                AuthService::new(
                    InMemoryUserRepository::new(),
                    hasher,
                    state.issuer.clone(),
                    state.clock.clone(),
                ),
                guard.clone(),
            ),
            domain_products::handlers::router(
                ProductService::new(InMemoryProductRepository::new()),
                guard,
            ),
        ),
    };

    Router::new()
        .nest("/users", users)
        .nest("/products", products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::{JwtConfig, create_router};
    use core_config::{app_info, server::ServerConfig};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config {
            app: app_info!(),
            environment: Environment::Development,
            server: ServerConfig::default(),
            jwt: JwtConfig::new("catalog-router-test-secret-32chars").unwrap(),
            database: None,
        };
        let state = AppState::new(config, None);
        create_router(routes(&state), health::router(&state), &state.config.server).unwrap()
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn token_for(app: &Router, username: &str, role: &str) -> String {
        let (status, _) = call(
            app,
            json_request(
                "POST",
                "/api/users/register",
                None,
                json!({ "username": username, "password": "pw", "role": role }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            app,
            json_request(
                "POST",
                "/api/users/login",
                None,
                json!({ "username": username, "password": "pw" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["accessToken"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = call(&app(), get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "catalog_api");
    }

    #[tokio::test]
    async fn test_ready_without_database() {
        let (status, _) = call(&app(), get("/ready", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = call(&app(), get("/api/nope", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_admin_and_user_flow() {
        let app = app();
        let admin = token_for(&app, "root", "Admin").await;
        let user = token_for(&app, "alice", "User").await;

        let (status, created) = call(
            &app,
            json_request(
                "POST",
                "/api/products",
                Some(&admin),
                json!({ "name": "Widget", "price": 10 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, _) = call(
            &app,
            json_request(
                "POST",
                "/api/products",
                Some(&user),
                json!({ "name": "Nope", "price": 1 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, page) = call(&app, get("/api/products?sortBy=name", Some(&user))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalCount"], 1);
        assert_eq!(page["items"][0]["name"], "Widget");

        let (status, me) = call(&app, get("/api/users/me", Some(&user))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me, json!({ "username": "alice", "role": "User" }));

        let (status, _) = call(
            &app,
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/products/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {admin}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_products_require_token() {
        let (status, body) = call(&app(), get("/api/products", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }
}
