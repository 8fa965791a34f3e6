//! Migrator commands against a real (SQLite) database.

mod support;

use catalog_service_lib::infra::Database;
use catalog_service_lib::service::{AttractionService, CatalogContainer, ImageService};
use domain::ListFilter;

use support::{image, seed_attraction, setup};

#[tokio::test]
async fn test_fresh_resets_data_and_reapplies_everything() {
    let catalog = setup().await;
    seed_attraction(&catalog).await;
    let db = Database::from_connection(catalog.db.clone());

    db.fresh_migrations().await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), 4);
    assert!(status.iter().all(|(_, applied)| *applied));

    let left = catalog
        .services
        .attractions()
        .list_attractions(ListFilter::all(), &[])
        .await
        .unwrap();
    assert!(left.is_empty());

    // Schema is usable again
    seed_attraction(&catalog).await;
}

#[tokio::test]
async fn test_rolling_back_constraints_keeps_tables() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let db = Database::from_connection(catalog.db.clone());

    db.rollback_migration().await.unwrap();
    let status = db.migration_status().await.unwrap();
    assert_eq!(status.iter().filter(|(_, applied)| *applied).count(), 3);

    catalog
        .services
        .images()
        .create_image(image(id, "crater", false))
        .await
        .unwrap();

    db.run_migrations().await.unwrap();
    assert!(db
        .migration_status()
        .await
        .unwrap()
        .iter()
        .all(|(_, applied)| *applied));
}
