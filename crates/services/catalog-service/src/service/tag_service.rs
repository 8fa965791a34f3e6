//! Tag service, including attaching tags to attractions.
//!
//! Attach and detach are idempotent: repeating either leaves the
//! association set unchanged and does not fail.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{validate_input, CreateTag, ListFilter, Tag, TagRelation, UpdateTag};

use crate::repository::{AttractionRepository, TagRepository};

#[async_trait]
pub trait TagService: Send + Sync {
    async fn list_tags(&self, filter: ListFilter, relations: &[TagRelation]) -> AppResult<Vec<Tag>>;

    async fn get_tag(&self, id: i32, relations: &[TagRelation]) -> AppResult<Tag>;

    async fn get_tag_with_deleted(&self, id: i32) -> AppResult<Tag>;

    /// Live tags of a live attraction
    async fn tags_for_attraction(&self, attraction_id: i32) -> AppResult<Vec<Tag>>;

    async fn create_tag(&self, input: CreateTag) -> AppResult<Tag>;

    async fn update_tag(&self, id: i32, input: UpdateTag) -> AppResult<Tag>;

    async fn delete_tag(&self, id: i32) -> AppResult<()>;

    async fn restore_tag(&self, id: i32) -> AppResult<Tag>;

    /// Remove the row and its attraction links
    async fn permanently_delete_tag(&self, id: i32) -> AppResult<()>;

    async fn attach_tag(&self, attraction_id: i32, tag_id: i32) -> AppResult<()>;

    async fn detach_tag(&self, attraction_id: i32, tag_id: i32) -> AppResult<()>;
}

pub struct TagManager {
    repo: Arc<dyn TagRepository>,
    attractions: Arc<dyn AttractionRepository>,
}

impl TagManager {
    pub fn new(repo: Arc<dyn TagRepository>, attractions: Arc<dyn AttractionRepository>) -> Self {
        Self { repo, attractions }
    }

    /// Both ends of an association must be live.
    async fn ensure_pair(&self, attraction_id: i32, tag_id: i32) -> AppResult<()> {
        if self.attractions.find_by_id(attraction_id, &[]).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if self.repo.find_by_id(tag_id, &[]).await?.is_none() {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TagService for TagManager {
    async fn list_tags(&self, filter: ListFilter, relations: &[TagRelation]) -> AppResult<Vec<Tag>> {
        self.repo.list(filter, relations).await
    }

    async fn get_tag(&self, id: i32, relations: &[TagRelation]) -> AppResult<Tag> {
        self.repo
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_tag_with_deleted(&self, id: i32) -> AppResult<Tag> {
        self.repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn tags_for_attraction(&self, attraction_id: i32) -> AppResult<Vec<Tag>> {
        if self.attractions.find_by_id(attraction_id, &[]).await?.is_none() {
            return Err(AppError::NotFound);
        }
        self.repo.find_by_attraction(attraction_id).await
    }

    async fn create_tag(&self, input: CreateTag) -> AppResult<Tag> {
        validate_input(&input)?;
        if self.repo.find_by_name_with_deleted(&input.name).await?.is_some() {
            return Err(AppError::conflict("Tag"));
        }

        let tag = self.repo.create(input).await?;
        tracing::info!(tag_id = tag.id, "Tag created");
        Ok(tag)
    }

    async fn update_tag(&self, id: i32, input: UpdateTag) -> AppResult<Tag> {
        validate_input(&input)?;
        if let Some(name) = &input.name {
            if let Some(existing) = self.repo.find_by_name_with_deleted(name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Tag"));
                }
            }
        }

        self.repo.update(id, input).await
    }

    async fn delete_tag(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }

    async fn restore_tag(&self, id: i32) -> AppResult<Tag> {
        self.repo.restore(id).await
    }

    async fn permanently_delete_tag(&self, id: i32) -> AppResult<()> {
        self.repo.permanently_delete(id).await?;
        tracing::info!(tag_id = id, "Tag permanently deleted");
        Ok(())
    }

    async fn attach_tag(&self, attraction_id: i32, tag_id: i32) -> AppResult<()> {
        self.ensure_pair(attraction_id, tag_id).await?;
        self.repo.attach(attraction_id, tag_id).await?;
        tracing::debug!(attraction_id, tag_id, "Tag attached");
        Ok(())
    }

    async fn detach_tag(&self, attraction_id: i32, tag_id: i32) -> AppResult<()> {
        self.ensure_pair(attraction_id, tag_id).await?;
        self.repo.detach(attraction_id, tag_id).await?;
        tracing::debug!(attraction_id, tag_id, "Tag detached");
        Ok(())
    }
}
