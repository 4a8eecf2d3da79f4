use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};

/// Repository trait for User persistence.
///
/// `insert` must reject an exact-match duplicate username with
/// [`UserError::UsernameTaken`] atomically, so two concurrent registrations
/// cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and assign its id
    async fn insert(&self, user: NewUser) -> UserResult<User>;

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Case-sensitive exact match
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;
}

#[derive(Debug, Default)]
struct Users {
    by_id: BTreeMap<i32, User>,
    last_id: i32,
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Users>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.by_id.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameTaken(user.username));
        }

        users.last_id += 1;
        let created = User {
            id: users.last_id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        users.by_id.insert(created.id, created.clone());

        tracing::info!(user_id = created.id, username = %created.username, "Created user");
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.by_id.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .by_id
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}
