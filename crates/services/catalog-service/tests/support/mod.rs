//! Shared fixtures: an in-memory SQLite catalog with real migrations.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, DatabaseConnection};

use catalog_service_lib::infra::Database;
use catalog_service_lib::service::{CatalogContainer, CatalogServices};
use domain::{
    CreateAttraction, CreateCategory, CreateImage, CreateProvince, CreateSource, ImportanceLevel,
};

pub struct Catalog {
    pub db: DatabaseConnection,
    pub services: CatalogServices,
}

/// Fresh database per test. SQLite in-memory pools hold a single
/// connection, so every test gets an isolated schema.
pub async fn setup() -> Catalog {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let connection = sea_orm::Database::connect(options)
        .await
        .expect("sqlite connection");
    let db = Database::from_connection(connection);
    db.run_migrations().await.expect("catalog migrations");

    Catalog {
        services: CatalogServices::new(db.get_connection()),
        db: db.get_connection(),
    }
}

pub struct Lookups {
    pub province_id: i32,
    pub category_id: i32,
    pub source_id: i32,
}

/// Province "Pichincha", category "Aventura", source "Fieldwork".
pub async fn seed_lookups(catalog: &Catalog) -> Lookups {
    let province = catalog
        .services
        .provinces()
        .create_province(CreateProvince {
            name: "Pichincha".to_string(),
        })
        .await
        .expect("province");
    let category = catalog
        .services
        .categories()
        .create_category(CreateCategory {
            name: "Aventura".to_string(),
            description: Some("Outdoor activities".to_string()),
            icon: Some("mountain".to_string()),
            color: Some("#2E7D32".to_string()),
        })
        .await
        .expect("category");
    let source = catalog
        .services
        .sources()
        .create_source(CreateSource {
            name: "Fieldwork".to_string(),
            url: None,
            obtained_on: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        })
        .await
        .expect("source");

    Lookups {
        province_id: province.id,
        category_id: category.id,
        source_id: source.id,
    }
}

pub fn cotopaxi(lookups: &Lookups) -> CreateAttraction {
    CreateAttraction {
        name: "Volcán Cotopaxi".to_string(),
        description: "Active stratovolcano in the Andes".to_string(),
        province_id: lookups.province_id,
        category_id: lookups.category_id,
        source_id: lookups.source_id,
        latitude: -0.6836,
        longitude: -78.4372,
        address: "Parque Nacional Cotopaxi".to_string(),
        importance: ImportanceLevel::High,
        state: None,
    }
}

/// Seed the lookups and one attraction; returns the attraction id.
pub async fn seed_attraction(catalog: &Catalog) -> (Lookups, i32) {
    let lookups = seed_lookups(catalog).await;
    let attraction = catalog
        .services
        .attractions()
        .create_attraction(cotopaxi(&lookups))
        .await
        .expect("attraction");
    (lookups, attraction.id)
}

pub fn image(attraction_id: i32, name: &str, is_principal: bool) -> CreateImage {
    CreateImage {
        attraction_id,
        url: format!("https://img.example.com/{}.jpg", name),
        description: Some(name.to_string()),
        is_principal,
    }
}
