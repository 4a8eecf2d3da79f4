//! Products Domain
//!
//! CRUD and paginated listing for products, with best-effort conflict
//! handling on update and delete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /products (Readers list/get, Admins write)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, NotFound / IdMismatch / Conflict policy
//! └──────┬──────┘
//!        │            query: plan + execute for listing
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + in-memory and Postgres (sea-orm) implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, inputs, PageRequest / PageResult
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let service = ProductService::new(InMemoryProductRepository::new());
//! let router = handlers::router(service, guard);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult, StoreError, StoreResult};
pub use models::{
    ListParams, PageRequest, PageResult, Product, ProductInput, SortField, SortOrder,
    UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
