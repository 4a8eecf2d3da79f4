//! JWT settings loaded through `core_config::FromEnv`.

use core_config::{ConfigError, FromEnv, env_optional, env_parse, env_required};

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_EXPIRE_MINUTES: i64 = 60;
/// One year.
const MAX_EXPIRE_MINUTES: i64 = 365 * 24 * 60;

/// JWT signing configuration.
///
/// Environment variables:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ISSUER`, `JWT_AUDIENCE` (optional; embedded and enforced when set)
/// - `JWT_EXPIRE_MINUTES` (default 60, at most one year)
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub expire_minutes: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            issuer: None,
            audience: None,
            expire_minutes: DEFAULT_EXPIRE_MINUTES,
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_expire_minutes(mut self, minutes: i64) -> Result<Self, ConfigError> {
        check_expire_minutes(minutes)?;
        self.expire_minutes = minutes;
        Ok(self)
    }
}

// The secret never appears in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

fn check_expire_minutes(minutes: i64) -> Result<(), ConfigError> {
    if !(1..=MAX_EXPIRE_MINUTES).contains(&minutes) {
        return Err(ConfigError::Invalid {
            key: "JWT_EXPIRE_MINUTES".to_string(),
            details: format!("must be between 1 and {MAX_EXPIRE_MINUTES} (got {minutes})"),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        let expire_minutes = env_parse("JWT_EXPIRE_MINUTES", DEFAULT_EXPIRE_MINUTES)?;
        check_expire_minutes(expire_minutes)?;

        Ok(Self {
            secret,
            issuer: env_optional("JWT_ISSUER"),
            audience: env_optional("JWT_AUDIENCE"),
            expire_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_new_rejects_short_secret() {
        assert!(JwtConfig::new("short").is_err());
        assert_eq!(JwtConfig::new(SECRET).unwrap().expire_minutes, 60);
    }

    #[test]
    fn test_jwt_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ISSUER", None),
                ("JWT_AUDIENCE", None),
                ("JWT_EXPIRE_MINUTES", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.issuer, None);
                assert_eq!(config.audience, None);
                assert_eq!(config.expire_minutes, 60);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_full() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ISSUER", Some("catalog-api")),
                ("JWT_AUDIENCE", Some("catalog-clients")),
                ("JWT_EXPIRE_MINUTES", Some("15")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.issuer.as_deref(), Some("catalog-api"));
                assert_eq!(config.audience.as_deref(), Some("catalog-clients"));
                assert_eq!(config.expire_minutes, 15);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_short_secret() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_jwt_config_rejects_non_positive_lifetime() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_EXPIRE_MINUTES", Some("0"))],
            || {
                assert!(JwtConfig::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_jwt_config_rejects_oversized_lifetime() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_EXPIRE_MINUTES", Some("1000000000000")),
            ],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_EXPIRE_MINUTES"));
            },
        );

        let config = JwtConfig::new(SECRET).unwrap();
        assert!(config.clone().with_expire_minutes(i64::MAX).is_err());
        assert!(config.clone().with_expire_minutes(0).is_err());
        assert_eq!(
            config.with_expire_minutes(525_600).unwrap().expire_minutes,
            525_600
        );
    }

    #[test]
    fn test_jwt_config_debug_redacts_secret() {
        let config = JwtConfig::new(SECRET).unwrap();
        assert!(!format!("{config:?}").contains(SECRET));
    }
}
