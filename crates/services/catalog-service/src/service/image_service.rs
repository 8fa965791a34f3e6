//! Image service - owns the principal image rule.
//!
//! After every write, at most one live image of an attraction has
//! `is_principal = true`:
//! - the first live image of an attraction becomes principal;
//! - marking an image principal unmarks its siblings first;
//! - updating the principal with `is_principal = false` leaves none;
//! - removing the principal promotes the lowest-id live sibling, if any;
//! - a restored image is principal only when the attraction has none.
//!
//! Each operation runs in a single transaction that first locks the parent
//! attraction row, so concurrent writers on one attraction take turns. The
//! partial unique index `uq_attraction_images_live_principal` backs this
//! up in storage.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{validate_input, CreateImage, Image, ImageRelation, ListFilter, UpdateImage};

use crate::infra::{TransactionContext, TxImageRepository, UnitOfWork};

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn list_images(
        &self,
        filter: ListFilter,
        relations: &[ImageRelation],
    ) -> AppResult<Vec<Image>>;

    async fn get_image(&self, id: i32, relations: &[ImageRelation]) -> AppResult<Image>;

    async fn get_image_with_deleted(&self, id: i32) -> AppResult<Image>;

    /// Live images of an attraction, ordered by id
    async fn images_for_attraction(&self, attraction_id: i32) -> AppResult<Vec<Image>>;

    async fn create_image(&self, input: CreateImage) -> AppResult<Image>;

    async fn update_image(&self, id: i32, input: UpdateImage) -> AppResult<Image>;

    /// Make this image the principal one of its attraction
    async fn set_principal(&self, id: i32) -> AppResult<Image>;

    async fn delete_image(&self, id: i32) -> AppResult<()>;

    async fn restore_image(&self, id: i32) -> AppResult<Image>;

    async fn permanently_delete_image(&self, id: i32) -> AppResult<()>;
}

pub struct ImageManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ImageManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Lock the image's attraction, then read the image (trashed included).
///
/// The read after the lock sees whatever a writer ahead of us committed.
async fn locked_image(ctx: &TransactionContext<'_>, id: i32) -> AppResult<Option<Image>> {
    let images = ctx.images();
    let Some(image) = images.find_by_id_with_deleted(id).await? else {
        return Ok(None);
    };
    ctx.lock_attraction(image.attraction_id).await?;
    images.find_by_id_with_deleted(id).await
}

/// Mark the lowest-id live image of the attraction principal.
async fn promote_first(
    images: &TxImageRepository<'_>,
    attraction_id: i32,
) -> AppResult<Option<i32>> {
    let remaining = images.find_by_attraction(attraction_id).await?;
    match remaining.first() {
        Some(first) => {
            images.mark_principal(first.id, true).await?;
            Ok(Some(first.id))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> ImageService for ImageManager<U> {
    async fn list_images(
        &self,
        filter: ListFilter,
        relations: &[ImageRelation],
    ) -> AppResult<Vec<Image>> {
        self.uow.images().list(filter, relations).await
    }

    async fn get_image(&self, id: i32, relations: &[ImageRelation]) -> AppResult<Image> {
        self.uow
            .images()
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_image_with_deleted(&self, id: i32) -> AppResult<Image> {
        self.uow
            .images()
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn images_for_attraction(&self, attraction_id: i32) -> AppResult<Vec<Image>> {
        self.uow.images().find_by_attraction(attraction_id).await
    }

    async fn create_image(&self, input: CreateImage) -> AppResult<Image> {
        validate_input(&input)?;

        let image = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let attraction = ctx.lock_attraction(input.attraction_id).await?;
                    if !attraction.is_some_and(|a| a.deleted_at.is_none()) {
                        return Err(AppError::validation(format!(
                            "Attraction {} does not exist",
                            input.attraction_id
                        )));
                    }

                    let images = ctx.images();
                    let first = images.find_by_attraction(input.attraction_id).await?.is_empty();
                    let principal = input.is_principal || first;
                    if principal {
                        images.clear_principal(input.attraction_id, None).await?;
                    }

                    images.create(input, principal).await
                })
            })
            .await?;

        tracing::info!(
            image_id = image.id,
            attraction_id = image.attraction_id,
            is_principal = image.is_principal,
            "Image created"
        );
        Ok(image)
    }

    async fn update_image(&self, id: i32, input: UpdateImage) -> AppResult<Image> {
        validate_input(&input)?;

        self.uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let current = locked_image(&ctx, id)
                        .await?
                        .filter(|image| image.deleted_at.is_none())
                        .ok_or(AppError::NotFound)?;
                    let images = ctx.images();

                    if input.is_principal == Some(true) {
                        images
                            .clear_principal(current.attraction_id, Some(id))
                            .await?;
                    }

                    images.update(id, input).await
                })
            })
            .await
    }

    async fn set_principal(&self, id: i32) -> AppResult<Image> {
        let image = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let current = locked_image(&ctx, id)
                        .await?
                        .filter(|image| image.deleted_at.is_none())
                        .ok_or(AppError::NotFound)?;
                    let images = ctx.images();

                    images
                        .clear_principal(current.attraction_id, Some(id))
                        .await?;
                    images.mark_principal(id, true).await?;

                    images.find_by_id(id).await?.ok_or(AppError::NotFound)
                })
            })
            .await?;

        tracing::info!(
            image_id = id,
            attraction_id = image.attraction_id,
            "Principal image changed"
        );
        Ok(image)
    }

    async fn delete_image(&self, id: i32) -> AppResult<()> {
        let promoted = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let current = locked_image(&ctx, id)
                        .await?
                        .filter(|image| image.deleted_at.is_none())
                        .ok_or(AppError::NotFound)?;
                    let images = ctx.images();

                    if !current.is_principal {
                        images.delete(id).await?;
                        return Ok(None);
                    }

                    // A trashed row never keeps the flag
                    images.mark_principal(id, false).await?;
                    images.delete(id).await?;
                    promote_first(&images, current.attraction_id).await
                })
            })
            .await?;

        tracing::info!(image_id = id, promoted = ?promoted, "Image deleted");
        Ok(())
    }

    async fn restore_image(&self, id: i32) -> AppResult<Image> {
        self.uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let trashed = locked_image(&ctx, id)
                        .await?
                        .filter(|image| image.deleted_at.is_some())
                        .ok_or(AppError::NotFound)?;
                    let images = ctx.images();

                    // Unflag before it becomes live again
                    images.mark_principal(id, false).await?;
                    images.restore(id).await?;
                    if !images.has_principal(trashed.attraction_id).await? {
                        images.mark_principal(id, true).await?;
                    }

                    images.find_by_id(id).await?.ok_or(AppError::NotFound)
                })
            })
            .await
    }

    async fn permanently_delete_image(&self, id: i32) -> AppResult<()> {
        let promoted = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let current = locked_image(&ctx, id).await?.ok_or(AppError::NotFound)?;
                    let images = ctx.images();

                    images.permanently_delete(id).await?;

                    if current.is_principal && current.deleted_at.is_none() {
                        promote_first(&images, current.attraction_id).await
                    } else {
                        Ok(None)
                    }
                })
            })
            .await?;

        tracing::info!(image_id = id, promoted = ?promoted, "Image permanently deleted");
        Ok(())
    }
}
