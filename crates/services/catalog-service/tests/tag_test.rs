//! Tags and their many-to-many link with attractions.

mod support;

use sea_orm::{EntityTrait, PaginatorTrait};

use catalog_service_lib::repository::entities::attraction_tag;
use catalog_service_lib::service::{AttractionService, CatalogContainer, TagService};
use common::AppError;
use domain::{AttractionRelation, CreateTag, Tag, TagRelation, UpdateTag};

use support::{seed_attraction, setup, Catalog};

async fn create_tag(catalog: &Catalog, name: &str) -> Tag {
    catalog
        .services
        .tags()
        .create_tag(CreateTag {
            name: name.to_string(),
        })
        .await
        .unwrap()
}

async fn link_count(catalog: &Catalog) -> u64 {
    attraction_tag::Entity::find()
        .count(&catalog.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_attach_twice_is_idempotent() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let tag = create_tag(&catalog, "volcán").await;
    let tags = catalog.services.tags();

    tags.attach_tag(id, tag.id).await.unwrap();
    tags.attach_tag(id, tag.id).await.unwrap();

    assert_eq!(link_count(&catalog).await, 1);
    let attached = tags.tags_for_attraction(id).await.unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].id, tag.id);
}

#[tokio::test]
async fn test_detach_without_link_is_noop() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let tag = create_tag(&catalog, "andes").await;
    let tags = catalog.services.tags();

    tags.detach_tag(id, tag.id).await.unwrap();
    assert_eq!(link_count(&catalog).await, 0);

    tags.attach_tag(id, tag.id).await.unwrap();
    tags.detach_tag(id, tag.id).await.unwrap();
    tags.detach_tag(id, tag.id).await.unwrap();

    assert_eq!(link_count(&catalog).await, 0);
    assert!(tags.tags_for_attraction(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attach_unknown_ends_not_found() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let tag = create_tag(&catalog, "andes").await;
    let tags = catalog.services.tags();

    assert!(matches!(
        tags.attach_tag(id, 999_999).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        tags.attach_tag(999_999, tag.id).await,
        Err(AppError::NotFound)
    ));
    assert_eq!(link_count(&catalog).await, 0);
}

#[tokio::test]
async fn test_trashed_tag_hidden_from_eager_load() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let volcano = create_tag(&catalog, "volcán").await;
    let hiking = create_tag(&catalog, "senderismo").await;
    let tags = catalog.services.tags();

    tags.attach_tag(id, volcano.id).await.unwrap();
    tags.attach_tag(id, hiking.id).await.unwrap();
    tags.delete_tag(hiking.id).await.unwrap();

    let attraction = catalog
        .services
        .attractions()
        .get_attraction(id, &[AttractionRelation::Tags])
        .await
        .unwrap();
    let loaded = attraction.tags.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "volcán");

    // The link itself survives a soft delete
    assert_eq!(link_count(&catalog).await, 2);

    tags.restore_tag(hiking.id).await.unwrap();
    assert_eq!(tags.tags_for_attraction(id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_tag_eager_loads_attractions() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let tag = create_tag(&catalog, "volcán").await;
    let tags = catalog.services.tags();

    tags.attach_tag(id, tag.id).await.unwrap();

    let loaded = tags
        .get_tag(tag.id, &[TagRelation::Attractions])
        .await
        .unwrap();
    let attractions = loaded.attractions.unwrap();
    assert_eq!(attractions.len(), 1);
    assert_eq!(attractions[0].id, id);

    // Soft-deleted attractions drop out of the list
    catalog.services.attractions().delete_attraction(id).await.unwrap();
    let loaded = tags
        .get_tag(tag.id, &[TagRelation::Attractions])
        .await
        .unwrap();
    assert!(loaded.attractions.unwrap().is_empty());
}

#[tokio::test]
async fn test_tag_names_are_unique() {
    let catalog = setup().await;
    let tag = create_tag(&catalog, "volcán").await;
    let other = create_tag(&catalog, "playa").await;
    let tags = catalog.services.tags();

    let duplicate = tags
        .create_tag(CreateTag {
            name: "volcán".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // A trashed tag still holds its name
    tags.delete_tag(tag.id).await.unwrap();
    let rename = tags
        .update_tag(
            other.id,
            UpdateTag {
                name: Some("volcán".to_string()),
            },
        )
        .await;
    assert!(matches!(rename, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_permanent_tag_delete_removes_links() {
    let catalog = setup().await;
    let (_, id) = seed_attraction(&catalog).await;
    let tag = create_tag(&catalog, "volcán").await;
    let tags = catalog.services.tags();

    tags.attach_tag(id, tag.id).await.unwrap();
    tags.permanently_delete_tag(tag.id).await.unwrap();

    assert_eq!(link_count(&catalog).await, 0);
    assert!(matches!(
        tags.get_tag_with_deleted(tag.id).await,
        Err(AppError::NotFound)
    ));
    assert!(catalog
        .services
        .attractions()
        .get_attraction(id, &[])
        .await
        .is_ok());
}
