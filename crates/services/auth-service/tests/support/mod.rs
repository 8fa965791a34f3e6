//! Shared fixtures: an in-memory SQLite auth store with real migrations.

#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{ConnectOptions, DatabaseConnection};

use auth_service_lib::infra::Database;
use auth_service_lib::service::AuthService;
use common::JwtConfig;
use domain::CreateUser;

pub const SECRET: &str = "integration-secret-with-at-least-32-chars";
pub const PASSWORD: &str = "correct horse battery";

pub struct Auth {
    pub db: DatabaseConnection,
    pub service: Arc<dyn AuthService>,
}

pub fn jwt() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        ..JwtConfig::default()
    }
}

pub async fn setup() -> Auth {
    setup_with(jwt()).await
}

/// Fresh single-connection database per test.
pub async fn setup_with(jwt: JwtConfig) -> Auth {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let connection = sea_orm::Database::connect(options)
        .await
        .expect("sqlite connection");
    let db = Database::from_connection(connection);
    db.run_migrations().await.expect("auth migrations");

    Auth {
        service: auth_service_lib::auth_service(db.get_connection(), &jwt).expect("auth service"),
        db: db.get_connection(),
    }
}

pub fn ana() -> CreateUser {
    CreateUser {
        email: "ana@example.com".to_string(),
        password: PASSWORD.to_string(),
        name: "Ana Quishpe".to_string(),
    }
}
