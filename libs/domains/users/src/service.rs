use axum_helpers::{AccessToken, Claims, Clock, TokenIssuer};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, NewUser, RegisterUser, UserView};
use crate::password::PasswordHasher;
use crate::repository::UserRepository;

/// Registration, login, and current-user lookup.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    hasher: PasswordHasher,
    issuer: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(
        repository: R,
        hasher: PasswordHasher,
        issuer: Arc<TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher,
            issuer,
            clock,
        }
    }

    /// Stores a new user with a hashed password. Role defaults to `User`.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterUser) -> UserResult<UserView> {
        input.validate()?;
        if input.username.trim().is_empty() {
            return Err(UserError::Validation("Username must not be blank".to_string()));
        }

        if self
            .repository
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            warn!("Registration rejected: username already exists");
            return Err(UserError::UsernameTaken(input.username));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let user = self
            .repository
            .insert(NewUser {
                username: input.username,
                password_hash,
                role: input.role.unwrap_or_default(),
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(UserView::from(user))
    }

    /// Checks credentials and issues an access token.
    ///
    /// Unknown usernames and wrong passwords fail identically, and both
    /// paths run one argon2 computation.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<AccessToken> {
        let Some(user) = self.repository.find_by_username(&input.username).await? else {
            let _ = self.hasher.hash(&input.password);
            warn!("Login failed");
            return Err(UserError::InvalidCredentials);
        };

        if !self.hasher.verify(&input.password, &user.password_hash) {
            warn!(user_id = user.id, "Login failed");
            return Err(UserError::InvalidCredentials);
        }

        let token = self
            .issuer
            .issue(user.id, &user.username, user.role, self.clock.now())?;

        info!(user_id = user.id, expires_at = %token.expires_at, "User logged in");
        Ok(token)
    }

    /// Resolves the user behind verified claims.
    #[instrument(skip(self, claims), fields(user_id = %claims.sub))]
    pub async fn current_user(&self, claims: &Claims) -> UserResult<UserView> {
        let not_found = || UserError::NotFound(claims.sub.clone());

        let id = claims.subject_id().ok_or_else(not_found)?;
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;

        Ok(UserView::from(user))
    }
}
