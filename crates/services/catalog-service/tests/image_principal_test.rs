//! Principal image rule: after any write an attraction has at most one
//! live principal image. Creates and deletes keep one whenever a live image
//! exists; only an explicit update to `is_principal = false` leaves none.

mod support;

use sea_orm::{ActiveModelTrait, Set};

use catalog_service_lib::repository::entities::image as image_entity;
use catalog_service_lib::service::{CatalogContainer, ImageService};
use common::AppError;
use domain::{Image, ListFilter, Trashed, UpdateImage};

use support::{image, seed_attraction, setup, Catalog};

async fn live_images(catalog: &Catalog, attraction_id: i32) -> Vec<Image> {
    catalog
        .services
        .images()
        .images_for_attraction(attraction_id)
        .await
        .unwrap()
}

async fn principal_ids(catalog: &Catalog, attraction_id: i32) -> Vec<i32> {
    live_images(catalog, attraction_id)
        .await
        .into_iter()
        .filter(|image| image.is_principal)
        .map(|image| image.id)
        .collect()
}

#[tokio::test]
async fn test_first_image_becomes_principal() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;

    let first = catalog
        .services
        .images()
        .create_image(image(id, "crater", false))
        .await
        .unwrap();
    let second = catalog
        .services
        .images()
        .create_image(image(id, "refuge", false))
        .await
        .unwrap();

    assert!(first.is_principal);
    assert!(!second.is_principal);
    assert_eq!(principal_ids(&catalog, id).await, vec![first.id]);
}

#[tokio::test]
async fn test_new_principal_unmarks_previous() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let first = images.create_image(image(id, "crater", true)).await.unwrap();
    let second = images.create_image(image(id, "summit", true)).await.unwrap();

    assert!(second.is_principal);
    let first = images.get_image(first.id, &[]).await.unwrap();
    assert!(!first.is_principal);
    assert_eq!(principal_ids(&catalog, id).await, vec![second.id]);
}

#[tokio::test]
async fn test_deleting_principal_promotes_lowest_id() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let a = images.create_image(image(id, "a", false)).await.unwrap();
    let b = images.create_image(image(id, "b", false)).await.unwrap();
    let c = images.create_image(image(id, "c", true)).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![c.id]);

    images.delete_image(c.id).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![a.id]);

    // The trashed image does not keep its flag
    let trashed = images.get_image_with_deleted(c.id).await.unwrap();
    assert!(trashed.deleted_at.is_some());
    assert!(!trashed.is_principal);

    images.delete_image(a.id).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![b.id]);
}

#[tokio::test]
async fn test_deleting_last_image_leaves_no_principal() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let only = images.create_image(image(id, "crater", false)).await.unwrap();
    images.delete_image(only.id).await.unwrap();

    assert!(live_images(&catalog, id).await.is_empty());
    assert!(matches!(
        images.delete_image(only.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_deleting_secondary_image_keeps_principal() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let principal = images.create_image(image(id, "crater", false)).await.unwrap();
    let other = images.create_image(image(id, "refuge", false)).await.unwrap();

    images.delete_image(other.id).await.unwrap();

    assert_eq!(principal_ids(&catalog, id).await, vec![principal.id]);
}

#[tokio::test]
async fn test_update_to_principal_unmarks_siblings() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let first = images.create_image(image(id, "crater", false)).await.unwrap();
    let second = images.create_image(image(id, "refuge", false)).await.unwrap();

    let updated = images
        .update_image(
            second.id,
            UpdateImage {
                description: Some("Refugio José Rivas".to_string()),
                is_principal: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.is_principal);
    assert_eq!(updated.description.as_deref(), Some("Refugio José Rivas"));
    assert_eq!(principal_ids(&catalog, id).await, vec![second.id]);
    assert!(!images.get_image(first.id, &[]).await.unwrap().is_principal);
}

#[tokio::test]
async fn test_set_principal_switches_flag() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let first = images.create_image(image(id, "crater", false)).await.unwrap();
    let second = images.create_image(image(id, "refuge", false)).await.unwrap();

    let marked = images.set_principal(second.id).await.unwrap();
    assert!(marked.is_principal);
    assert_eq!(principal_ids(&catalog, id).await, vec![second.id]);

    // Marking the current principal again changes nothing
    images.set_principal(second.id).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![second.id]);

    images.set_principal(first.id).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![first.id]);

    assert!(matches!(
        images.set_principal(999_999).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_restore_only_claims_principal_when_vacant() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let first = images.create_image(image(id, "crater", false)).await.unwrap();
    let second = images.create_image(image(id, "refuge", false)).await.unwrap();

    // Second goes to the trash as a secondary image and comes back as one
    images.delete_image(second.id).await.unwrap();
    let restored = images.restore_image(second.id).await.unwrap();
    assert!(!restored.is_principal);
    assert_eq!(principal_ids(&catalog, id).await, vec![first.id]);

    // With every image trashed, the restored one takes the flag
    images.delete_image(first.id).await.unwrap();
    images.delete_image(second.id).await.unwrap();
    let restored = images.restore_image(first.id).await.unwrap();
    assert!(restored.is_principal);
    assert_eq!(principal_ids(&catalog, id).await, vec![first.id]);

    assert!(matches!(
        images.restore_image(first.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_permanent_delete_promotes_when_principal_removed() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let first = images.create_image(image(id, "crater", false)).await.unwrap();
    let second = images.create_image(image(id, "refuge", false)).await.unwrap();
    let third = images.create_image(image(id, "summit", false)).await.unwrap();

    images.permanently_delete_image(first.id).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![second.id]);
    assert!(matches!(
        images.get_image_with_deleted(first.id).await,
        Err(AppError::NotFound)
    ));

    // Removing a trashed image leaves the live principal alone
    images.delete_image(third.id).await.unwrap();
    images.permanently_delete_image(third.id).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![second.id]);

    let trashed = images
        .list_images(ListFilter::all().with_trashed(Trashed::Only), &[])
        .await
        .unwrap();
    assert!(trashed.is_empty());
}

#[tokio::test]
async fn test_at_most_one_principal_through_mixed_operations() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let mut ids = Vec::new();
    for (name, principal) in [("a", false), ("b", true), ("c", false), ("d", true)] {
        ids.push(images.create_image(image(id, name, principal)).await.unwrap().id);
        assert_eq!(principal_ids(&catalog, id).await.len(), 1);
    }

    images.delete_image(ids[3]).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await.len(), 1);

    images.set_principal(ids[2]).await.unwrap();
    images.restore_image(ids[3]).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![ids[2]]);

    images.permanently_delete_image(ids[2]).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![ids[0]]);

    for image_id in [ids[0], ids[1], ids[3]] {
        images.delete_image(image_id).await.unwrap();
        let principals = principal_ids(&catalog, id).await;
        let remaining = live_images(&catalog, id).await;
        assert_eq!(principals.len(), usize::from(!remaining.is_empty()));
    }
}

#[tokio::test]
async fn test_image_for_unknown_attraction_fails_validation() {
    let catalog = setup().await;

    let result = catalog
        .services
        .images()
        .create_image(image(424_242, "crater", false))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_unsetting_principal_by_update_leaves_none() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let images = catalog.services.images();

    let first = images.create_image(image(id, "crater", false)).await.unwrap();
    images.create_image(image(id, "refuge", false)).await.unwrap();

    let updated = images
        .update_image(
            first.id,
            UpdateImage {
                is_principal: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!updated.is_principal);
    assert!(principal_ids(&catalog, id).await.is_empty());
    assert_eq!(live_images(&catalog, id).await.len(), 2);

    // The next principal request claims the vacant slot
    let third = images.create_image(image(id, "summit", true)).await.unwrap();
    assert_eq!(principal_ids(&catalog, id).await, vec![third.id]);
}

#[tokio::test]
async fn test_concurrent_creates_leave_one_principal() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;

    let mut handles = Vec::new();
    for n in 0..8 {
        let images = catalog.services.images();
        handles.push(tokio::spawn(async move {
            images
                .create_image(image(id, &format!("shot-{}", n), n % 2 == 0))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(live_images(&catalog, id).await.len(), 8);
    assert_eq!(principal_ids(&catalog, id).await.len(), 1);
}

#[tokio::test]
async fn test_storage_rejects_second_live_principal() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let first = catalog
        .services
        .images()
        .create_image(image(id, "crater", true))
        .await
        .unwrap();
    assert!(first.is_principal);

    let row = |name: &str, deleted: bool| {
        let now = chrono::Utc::now();
        image_entity::ActiveModel {
            attraction_id: Set(id),
            url: Set(format!("https://img.example.com/{}.jpg", name)),
            description: Set(None),
            is_principal: Set(true),
            status: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(deleted.then_some(now)),
            ..Default::default()
        }
    };

    // Bypassing the service: the partial unique index still holds
    assert!(row("rogue", false).insert(&catalog.db).await.is_err());

    // Trashed rows are outside the index
    assert!(row("archived", true).insert(&catalog.db).await.is_ok());
}
