use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{Product, ProductInput, SortField, SortOrder};

/// Repository trait for Product persistence
///
/// Writes report lost races as [`StoreError`] values; the service decides
/// what they mean for the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn count(&self) -> StoreResult<u64>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Product>>;

    /// One ordered slice. Rows with equal sort keys come back in ascending
    /// id order, whichever direction is requested.
    async fn find_ordered(
        &self,
        field: SortField,
        order: SortOrder,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<Product>>;

    /// Insert a product and assign its id
    async fn insert(&self, input: ProductInput) -> StoreResult<Product>;

    /// Full replace of `name` and `price` for `product.id`.
    /// [`StoreError::Missing`] if no row was written.
    async fn update(&self, product: Product) -> StoreResult<()>;

    async fn delete(&self, id: i32) -> StoreResult<()>;

    async fn exists(&self, id: i32) -> StoreResult<bool>;
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.cmp(&b.price),
    }
}

#[derive(Debug, Default)]
struct Products {
    by_id: BTreeMap<i32, Product>,
    last_id: i32,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Products>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn count(&self) -> StoreResult<u64> {
        Ok(self.products.read().await.by_id.len() as u64)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.by_id.get(&id).cloned())
    }

    async fn find_ordered(
        &self,
        field: SortField,
        order: SortOrder,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<Product>> {
        let products = self.products.read().await;

        // BTreeMap iterates in id order; sort_by is stable.
        let mut rows: Vec<&Product> = products.by_id.values().collect();
        match order {
            SortOrder::Asc => rows.sort_by(|a, b| compare(a, b, field)),
            SortOrder::Desc => rows.sort_by(|a, b| compare(b, a, field)),
        }

        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, input: ProductInput) -> StoreResult<Product> {
        let mut products = self.products.write().await;

        products.last_id += 1;
        let created = Product {
            id: products.last_id,
            name: input.name,
            price: input.price,
        };
        products.by_id.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, product: Product) -> StoreResult<()> {
        let mut products = self.products.write().await;

        match products.by_id.get_mut(&product.id) {
            Some(existing) => {
                *existing = product;
                Ok(())
            }
            None => Err(StoreError::Missing),
        }
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let mut products = self.products.write().await;
        products
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::Missing)
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        Ok(self.products.read().await.by_id.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(name: &str) -> ProductInput {
        ProductInput {
            name: name.into(),
            price: dec!(1),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryProductRepository::new();
        let a = repo.insert(input("a")).await.unwrap();
        let b = repo.insert(input("b")).await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let a = repo.insert(input("a")).await.unwrap();
        repo.delete(a.id).await.unwrap();

        let b = repo.insert(input("b")).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_rows() {
        let repo = InMemoryProductRepository::new();
        let ghost = Product {
            id: 9,
            name: "ghost".into(),
            price: dec!(0),
        };

        assert_eq!(repo.update(ghost).await, Err(StoreError::Missing));
        assert_eq!(repo.delete(9).await, Err(StoreError::Missing));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(input("a")).await.unwrap();

        repo.update(Product {
            id: created.id,
            name: "renamed".into(),
            price: dec!(7.25),
        })
        .await
        .unwrap();

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(stored.price, dec!(7.25));
    }

    #[tokio::test]
    async fn test_find_ordered_by_name_with_offset() {
        let repo = InMemoryProductRepository::new();
        for name in ["c", "a", "b", "d"] {
            repo.insert(input(name)).await.unwrap();
        }

        let page = repo
            .find_ordered(SortField::Name, SortOrder::Asc, 1, 2)
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
