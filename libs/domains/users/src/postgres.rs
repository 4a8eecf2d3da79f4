use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User},
    repository::UserRepository,
};

/// Postgres-backed [`UserRepository`]. Uniqueness is enforced by the
/// `users.username` unique index.
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn store_error(e: DbErr) -> UserError {
    UserError::Store(format!("Database error: {e}"))
}

/// A unique-index hit on insert means a concurrent registration took the
/// username first.
fn insert_error(username: &str, sql_err: Option<SqlErr>, e: DbErr) -> UserError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::UsernameTaken(username.to_string()),
        _ => store_error(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let active_model = entity::ActiveModel {
            id: NotSet,
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash),
            role: Set(user.role.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(&user.username, e.sql_err(), e))?;

        tracing::info!(user_id = model.id, username = %model.username, "Created user");
        User::try_from(model)
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(User::try_from)
            .transpose()
    }
}
