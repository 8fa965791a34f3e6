//! Combined binary - both services against one database.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service_lib::service::{AttractionService, CatalogContainer};
use domain::ListFilter;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Tourist attraction catalog with authentication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect both services, apply pending migrations and report
    Check,
    /// Run database migrations for all services
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration of each service
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            let (catalog, auth) = tokio::join!(
                catalog_service_lib::bootstrap(),
                auth_service_lib::bootstrap()
            );
            let catalog = catalog?;
            auth?;

            let attractions = catalog
                .attractions()
                .list_attractions(ListFilter::active(), &[])
                .await?;
            info!(active_attractions = attractions.len(), "Catalog and auth ready");
        }
        Commands::Migrate { action } => match action {
            MigrateAction::Up => {
                catalog_service_lib::run_migrations(catalog_service_lib::MigrateAction::Up).await?;
                auth_service_lib::run_migrations(auth_service_lib::MigrateAction::Up).await?;
            }
            MigrateAction::Down => {
                // Auth tables were created last
                auth_service_lib::run_migrations(auth_service_lib::MigrateAction::Down).await?;
                catalog_service_lib::run_migrations(catalog_service_lib::MigrateAction::Down)
                    .await?;
            }
            MigrateAction::Status => {
                println!("catalog:");
                catalog_service_lib::run_migrations(catalog_service_lib::MigrateAction::Status)
                    .await?;
                println!("auth:");
                auth_service_lib::run_migrations(auth_service_lib::MigrateAction::Status).await?;
            }
            MigrateAction::Fresh => {
                // Fresh drops every table in the schema, auth's included
                catalog_service_lib::run_migrations(catalog_service_lib::MigrateAction::Fresh)
                    .await?;
                auth_service_lib::run_migrations(auth_service_lib::MigrateAction::Up).await?;
            }
        },
    }

    Ok(())
}
