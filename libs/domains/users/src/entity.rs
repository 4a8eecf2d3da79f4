use axum_helpers::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::UserError;
use crate::models::User;

/// Sea-ORM Entity for the `users` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = UserError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: Role = model.role.parse().map_err(|_| {
            UserError::Store(format!("user {} has unknown role '{}'", model.id, model.role))
        })?;

        Ok(Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            role,
        })
    }
}
