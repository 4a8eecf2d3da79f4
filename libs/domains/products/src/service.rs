//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{ProductError, ProductResult, StoreError};
use crate::models::{ListParams, PageResult, Product, ProductInput, UpdateProduct};
use crate::query;
use crate::repository::ProductRepository;

/// Product service providing business logic operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of products. Paging input is clamped, never rejected.
    #[instrument(skip(self))]
    pub async fn list(&self, params: ListParams) -> ProductResult<PageResult<Product>> {
        let request = query::plan(
            params.page,
            params.page_size,
            params.sort_by.as_deref(),
            params.order.as_deref(),
        );

        let page = query::execute(self.repository.as_ref(), &request).await?;
        info!(
            total = page.total_count,
            page = page.page_index,
            "Listed products"
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        input.validate()?;

        let product = self.repository.insert(input).await?;
        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    /// Full replacement of a product.
    ///
    /// No version token is compared. A write that loses a race is resolved
    /// by re-checking existence: a row deleted in the meantime is
    /// `NotFound`, a row still present is a retryable `Conflict`.
    #[instrument(skip(self, replacement))]
    pub async fn update(&self, id: i32, replacement: UpdateProduct) -> ProductResult<()> {
        if replacement.id != id {
            return Err(ProductError::IdMismatch {
                path: id,
                body: replacement.id,
            });
        }
        replacement.validate()?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        match self.repository.update(replacement.into_product()).await {
            Ok(()) => {
                info!(product_id = id, "Product updated");
                Ok(())
            }
            Err(StoreError::Conflict | StoreError::Missing) => {
                if self.repository.exists(id).await? {
                    warn!(product_id = id, "Update lost a write race");
                    Err(ProductError::Conflict(id))
                } else {
                    warn!(product_id = id, "Product deleted during update");
                    Err(ProductError::NotFound(id))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> ProductResult<()> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        match self.repository.delete(id).await {
            Ok(()) => {
                info!(product_id = id, "Product deleted");
                Ok(())
            }
            Err(StoreError::Missing) => {
                warn!(product_id = id, "Product deleted concurrently");
                Err(ProductError::NotFound(id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn product(id: i32, name: &str, price: Decimal) -> Product {
        Product {
            id,
            name: name.into(),
            price,
        }
    }

    fn replacement(id: i32, name: &str, price: Decimal) -> UpdateProduct {
        UpdateProduct {
            id,
            name: name.into(),
            price,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = ProductService::new(InMemoryProductRepository::new());

        let created = service
            .create(ProductInput {
                name: "X".into(),
                price: dec!(10),
            })
            .await
            .unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched.name, "X");
        assert_eq!(fetched.price, dec!(10));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().never();
        let service = ProductService::new(repo);

        for (name, price) in [("", dec!(1)), ("  ", dec!(1)), ("X", dec!(-1))] {
            let result = service
                .create(ProductInput {
                    name: name.into(),
                    price,
                })
                .await;
            assert!(matches!(result, Err(ProductError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = ProductService::new(InMemoryProductRepository::new());
        assert!(matches!(
            service.get(42).await,
            Err(ProductError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_update_id_mismatch_touches_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_update().never();
        let service = ProductService::new(repo);

        let result = service.update(1, replacement(2, "X", dec!(1))).await;

        assert!(matches!(
            result,
            Err(ProductError::IdMismatch { path: 1, body: 2 })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_without_write() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_update().never();
        let service = ProductService::new(repo);

        let result = service.update(5, replacement(5, "X", dec!(1))).await;
        assert!(matches!(result, Err(ProductError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service
            .create(ProductInput {
                name: "old".into(),
                price: dec!(1),
            })
            .await
            .unwrap();

        service
            .update(created.id, replacement(created.id, "new", dec!(2.5)))
            .await
            .unwrap();

        assert_eq!(
            service.get(created.id).await.unwrap(),
            product(created.id, "new", dec!(2.5))
        );
    }

    #[tokio::test]
    async fn test_update_conflict_on_live_row_is_conflict() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(product(id, "X", dec!(1)))));
        repo.expect_update()
            .times(1)
            .returning(|_| Err(StoreError::Conflict));
        repo.expect_exists().with(eq(3)).times(1).returning(|_| Ok(true));
        let service = ProductService::new(repo);

        let result = service.update(3, replacement(3, "Y", dec!(2))).await;
        assert!(matches!(result, Err(ProductError::Conflict(3))));
    }

    #[tokio::test]
    async fn test_update_conflict_on_deleted_row_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(product(id, "X", dec!(1)))));
        repo.expect_update()
            .times(1)
            .returning(|_| Err(StoreError::Missing));
        repo.expect_exists().times(1).returning(|_| Ok(false));
        let service = ProductService::new(repo);

        let result = service.update(3, replacement(3, "Y", dec!(2))).await;
        assert!(matches!(result, Err(ProductError::NotFound(3))));
    }

    #[tokio::test]
    async fn test_update_store_outage_is_store_error() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(product(id, "X", dec!(1)))));
        repo.expect_update()
            .returning(|_| Err(StoreError::Unavailable("down".into())));
        repo.expect_exists().never();
        let service = ProductService::new(repo);

        let result = service.update(3, replacement(3, "Y", dec!(2))).await;
        assert!(matches!(result, Err(ProductError::Store(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_without_mutation() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_delete().never();
        let service = ProductService::new(repo);

        assert!(matches!(
            service.delete(9).await,
            Err(ProductError::NotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_delete_racing_removal_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(product(id, "X", dec!(1)))));
        repo.expect_delete()
            .times(1)
            .returning(|_| Err(StoreError::Missing));
        let service = ProductService::new(repo);

        assert!(matches!(
            service.delete(4).await,
            Err(ProductError::NotFound(4))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service
            .create(ProductInput {
                name: "X".into(),
                price: dec!(1),
            })
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get(created.id).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_clamps_params() {
        let service = ProductService::new(InMemoryProductRepository::new());
        for i in 1..=3 {
            service
                .create(ProductInput {
                    name: format!("p{i}"),
                    price: Decimal::from(i * 100),
                })
                .await
                .unwrap();
        }

        let page = service
            .list(ListParams {
                page: Some(0),
                page_size: Some(1000),
                sort_by: Some("PRICE".into()),
                order: Some("DESC".into()),
            })
            .await
            .unwrap();

        assert_eq!(page.page_index, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.items[0].price, dec!(300));
    }
}
