use axum_helpers::{AccessToken, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC string, never exposed in API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

/// A user about to be inserted; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Registration request.
#[derive(Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Defaults to `User` when omitted.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login request.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Passwords stay out of Debug output, which ends up in spans.
impl std::fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUser")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role,
        }
    }
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.token,
            token_type: "Bearer".to_string(),
            expires_at: token.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Admin,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "Admin");
    }

    #[test]
    fn test_register_user_validation() {
        let ok: RegisterUser =
            serde_json::from_str(r#"{"username":"alice","password":"pw"}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.role, None);

        let long = RegisterUser {
            username: "x".repeat(51),
            password: "pw".into(),
            role: None,
        };
        assert!(long.validate().is_err());

        let at_limit = RegisterUser {
            username: "x".repeat(50),
            password: "pw".into(),
            role: None,
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_register_user_accepts_role() {
        let input: RegisterUser =
            serde_json::from_str(r#"{"username":"root","password":"pw","role":"Admin"}"#).unwrap();
        assert_eq!(input.role, Some(Role::Admin));
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            username: "alice".into(),
            password: "pw".into(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            username: String::new(),
            password: "pw".into(),
        };
        assert!(empty.validate().is_err());

        let long = LoginRequest {
            username: "x".repeat(51),
            password: "pw".into(),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_debug_never_prints_passwords() {
        let input = LoginRequest {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{input:?}").contains("hunter2"));
    }
}
