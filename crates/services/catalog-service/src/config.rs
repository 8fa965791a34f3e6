//! Catalog service configuration.

use common::DatabaseConfig;

/// Catalog service configuration.
#[derive(Debug, Clone, Default)]
pub struct CatalogServiceConfig {
    pub database: DatabaseConfig,
}

impl CatalogServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `CATALOG_SERVICE_DATABASE_URL` wins over `DATABASE_URL`.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env("CATALOG_SERVICE"),
        }
    }
}
