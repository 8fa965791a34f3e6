//! Catalog Service - migrations and a connectivity check.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service_lib::service::{AttractionService, CatalogContainer, ProvinceService};
use catalog_service_lib::MigrateAction;
use domain::ListFilter;

#[derive(Parser)]
#[command(name = "catalog-service")]
#[command(about = "Tourist attraction catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, migrate and report catalog counts
    Check,
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
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
            let services = catalog_service_lib::bootstrap().await?;
            let provinces = services.provinces().list_provinces(ListFilter::all(), &[]).await?;
            let attractions = services
                .attractions()
                .list_attractions(ListFilter::all(), &[])
                .await?;
            tracing::info!(
                provinces = provinces.len(),
                attractions = attractions.len(),
                "Catalog database reachable"
            );
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            catalog_service_lib::run_migrations(migrate_action).await?;
        }
    }

    Ok(())
}
