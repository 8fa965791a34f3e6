//! Auth service configuration.

use common::{DatabaseConfig, JwtConfig};

/// Auth service configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthServiceConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `AUTH_SERVICE_DATABASE_URL` wins over `DATABASE_URL`. Fails when
    /// `JWT_SECRET` is missing or shorter than 32 characters.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            database: DatabaseConfig::from_env("AUTH_SERVICE"),
            jwt: JwtConfig::from_env()?,
        })
    }

    /// Database settings only, for migration commands that never sign tokens.
    pub fn database_from_env() -> DatabaseConfig {
        DatabaseConfig::from_env("AUTH_SERVICE")
    }
}
