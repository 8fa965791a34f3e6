//! Auth Service Library
//!
//! Users, argon2 password checks and revocable JWT access/refresh tokens.
//! Exposes [`service::AuthService`] for an API front end and a migration
//! CLI. Can be run standalone or through the combined binary.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::AuthServiceConfig;
use crate::infra::{Database, Persistence};
use crate::repository::UserStore;
use crate::service::{AuthService, Authenticator};
use common::{AppResult, JwtConfig};

/// Wire the repositories and the authenticator over one connection.
pub fn auth_service(db: DatabaseConnection, jwt: &JwtConfig) -> AppResult<Arc<dyn AuthService>> {
    let users = Arc::new(UserStore::new(db.clone()));
    let uow = Arc::new(Persistence::new(db));
    Ok(Arc::new(Authenticator::new(users, uow, jwt)?))
}

/// Connect, apply pending migrations and build the service.
pub async fn bootstrap() -> Result<Arc<dyn AuthService>, Box<dyn std::error::Error>> {
    let config = AuthServiceConfig::from_env()?;
    let db = Database::connect(&config.database).await?;
    db.ping().await?;
    Ok(auth_service(db.get_connection(), &config.jwt)?)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AuthServiceConfig::database_from_env();
    let db = Database::connect_without_migrations(&config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Auth migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last auth migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Auth database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
