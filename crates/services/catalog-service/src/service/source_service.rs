//! Source service.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{validate_input, CreateSource, ListFilter, Source, SourceRelation, UpdateSource};

use crate::repository::SourceRepository;

#[async_trait]
pub trait SourceService: Send + Sync {
    async fn list_sources(
        &self,
        filter: ListFilter,
        relations: &[SourceRelation],
    ) -> AppResult<Vec<Source>>;

    async fn get_source(&self, id: i32, relations: &[SourceRelation]) -> AppResult<Source>;

    async fn get_source_with_deleted(&self, id: i32) -> AppResult<Source>;

    async fn create_source(&self, input: CreateSource) -> AppResult<Source>;

    async fn update_source(&self, id: i32, input: UpdateSource) -> AppResult<Source>;

    async fn delete_source(&self, id: i32) -> AppResult<()>;

    async fn restore_source(&self, id: i32) -> AppResult<Source>;

    async fn permanently_delete_source(&self, id: i32) -> AppResult<()>;
}

pub struct SourceManager {
    repo: Arc<dyn SourceRepository>,
}

impl SourceManager {
    pub fn new(repo: Arc<dyn SourceRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SourceService for SourceManager {
    async fn list_sources(
        &self,
        filter: ListFilter,
        relations: &[SourceRelation],
    ) -> AppResult<Vec<Source>> {
        self.repo.list(filter, relations).await
    }

    async fn get_source(&self, id: i32, relations: &[SourceRelation]) -> AppResult<Source> {
        self.repo
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_source_with_deleted(&self, id: i32) -> AppResult<Source> {
        self.repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_source(&self, input: CreateSource) -> AppResult<Source> {
        validate_input(&input)?;

        let source = self.repo.create(input).await?;
        tracing::info!(source_id = source.id, "Source created");
        Ok(source)
    }

    async fn update_source(&self, id: i32, input: UpdateSource) -> AppResult<Source> {
        validate_input(&input)?;
        self.repo.update(id, input).await
    }

    async fn delete_source(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }

    async fn restore_source(&self, id: i32) -> AppResult<Source> {
        self.repo.restore(id).await
    }

    async fn permanently_delete_source(&self, id: i32) -> AppResult<()> {
        if self.repo.find_by_id_with_deleted(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if self.repo.count_attractions(id).await? > 0 {
            return Err(AppError::validation(
                "Source still has attractions and cannot be removed",
            ));
        }

        self.repo.permanently_delete(id).await
    }
}
