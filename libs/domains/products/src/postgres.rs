use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr,
};

use crate::{
    entity,
    error::{StoreError, StoreResult},
    models::{Product, ProductInput, SortField, SortOrder},
    repository::ProductRepository,
};

/// Postgres `serialization_failure`
const SERIALIZATION_FAILURE: &str = "40001";

/// Postgres-backed [`ProductRepository`].
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn is_serialization_failure(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == SERIALIZATION_FAILURE),
        _ => false,
    }
}

fn store_error(e: DbErr) -> StoreError {
    if is_serialization_failure(&e) {
        StoreError::Conflict
    } else {
        StoreError::Unavailable(format!("Database error: {e}"))
    }
}

fn column(field: SortField) -> entity::Column {
    match field {
        SortField::Id => entity::Column::Id,
        SortField::Name => entity::Column::Name,
        SortField::Price => entity::Column::Price,
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn count(&self) -> StoreResult<u64> {
        entity::Entity::find()
            .count(&self.db)
            .await
            .map_err(store_error)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(Product::from))
    }

    async fn find_ordered(
        &self,
        field: SortField,
        order: SortOrder,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<Product>> {
        let direction = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let mut query = entity::Entity::find().order_by(column(field), direction);
        if field != SortField::Id {
            query = query.order_by_asc(entity::Column::Id);
        }

        let models = query
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn insert(&self, input: ProductInput) -> StoreResult<Product> {
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            price: Set(input.price),
        };

        let model = active_model.insert(&self.db).await.map_err(store_error)?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> StoreResult<()> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Name, Expr::value(product.name))
            .col_expr(entity::Column::Price, Expr::value(product.price))
            .filter(entity::Column::Id.eq(product.id))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::Missing);
        }

        tracing::info!(product_id = product.id, "Updated product");
        Ok(())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::Missing);
        }

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        let count = entity::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(store_error)?;

        Ok(count > 0)
    }
}
