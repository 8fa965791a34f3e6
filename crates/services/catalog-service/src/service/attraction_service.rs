//! Attraction service - the aggregate root of the catalog.
//!
//! Validates coordinates and references, fills defaults, and exposes the
//! listing queries (by province, by category, search).

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{
    validate_input, Attraction, AttractionRelation, CreateAttraction, ListFilter,
    UpdateAttraction, DEFAULT_ATTRACTION_STATE,
};

use crate::repository::{
    AttractionRepository, CategoryRepository, ProvinceRepository, SourceRepository,
};

#[async_trait]
pub trait AttractionService: Send + Sync {
    async fn list_attractions(
        &self,
        filter: ListFilter,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>>;

    /// Get live attraction by ID with the requested relations
    async fn get_attraction(
        &self,
        id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Attraction>;

    /// Get attraction with every relation loaded
    async fn get_attraction_details(&self, id: i32) -> AppResult<Attraction>;

    async fn get_attraction_with_deleted(&self, id: i32) -> AppResult<Attraction>;

    /// Active attractions of a province with province, category and images
    async fn list_by_province(&self, province_id: i32) -> AppResult<Vec<Attraction>>;

    /// Active attractions of a category with province, category and images
    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Attraction>>;

    /// Substring search over name and description of active attractions
    async fn search_attractions(&self, term: &str) -> AppResult<Vec<Attraction>>;

    async fn create_attraction(&self, input: CreateAttraction) -> AppResult<Attraction>;

    async fn update_attraction(&self, id: i32, input: UpdateAttraction) -> AppResult<Attraction>;

    /// Soft delete; children are left untouched
    async fn delete_attraction(&self, id: i32) -> AppResult<()>;

    async fn restore_attraction(&self, id: i32) -> AppResult<Attraction>;

    /// Remove the row together with its contact, images and tag links
    async fn permanently_delete_attraction(&self, id: i32) -> AppResult<()>;
}

pub struct AttractionManager {
    repo: Arc<dyn AttractionRepository>,
    provinces: Arc<dyn ProvinceRepository>,
    categories: Arc<dyn CategoryRepository>,
    sources: Arc<dyn SourceRepository>,
}

impl AttractionManager {
    pub fn new(
        repo: Arc<dyn AttractionRepository>,
        provinces: Arc<dyn ProvinceRepository>,
        categories: Arc<dyn CategoryRepository>,
        sources: Arc<dyn SourceRepository>,
    ) -> Self {
        Self {
            repo,
            provinces,
            categories,
            sources,
        }
    }

    /// Referenced rows must exist and be live.
    async fn ensure_references(
        &self,
        province_id: Option<i32>,
        category_id: Option<i32>,
        source_id: Option<i32>,
    ) -> AppResult<()> {
        if let Some(id) = province_id {
            if self.provinces.find_by_id(id, &[]).await?.is_none() {
                return Err(AppError::validation(format!("Province {} does not exist", id)));
            }
        }
        if let Some(id) = category_id {
            if self.categories.find_by_id(id, &[]).await?.is_none() {
                return Err(AppError::validation(format!("Category {} does not exist", id)));
            }
        }
        if let Some(id) = source_id {
            if self.sources.find_by_id(id, &[]).await?.is_none() {
                return Err(AppError::validation(format!("Source {} does not exist", id)));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AttractionService for AttractionManager {
    async fn list_attractions(
        &self,
        filter: ListFilter,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>> {
        self.repo.list(filter, relations).await
    }

    async fn get_attraction(
        &self,
        id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Attraction> {
        tracing::debug!(attraction_id = id, ?relations, "Loading attraction");
        self.repo
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_attraction_details(&self, id: i32) -> AppResult<Attraction> {
        self.get_attraction(id, &AttractionRelation::ALL).await
    }

    async fn get_attraction_with_deleted(&self, id: i32) -> AppResult<Attraction> {
        self.repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_by_province(&self, province_id: i32) -> AppResult<Vec<Attraction>> {
        self.repo
            .find_by_province(province_id, &AttractionRelation::LISTING)
            .await
    }

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Attraction>> {
        self.repo
            .find_by_category(category_id, &AttractionRelation::LISTING)
            .await
    }

    async fn search_attractions(&self, term: &str) -> AppResult<Vec<Attraction>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::validation("Search term must not be empty"));
        }

        self.repo.search(term, &AttractionRelation::LISTING).await
    }

    async fn create_attraction(&self, mut input: CreateAttraction) -> AppResult<Attraction> {
        validate_input(&input)?;
        self.ensure_references(
            Some(input.province_id),
            Some(input.category_id),
            Some(input.source_id),
        )
        .await?;

        input
            .state
            .get_or_insert_with(|| DEFAULT_ATTRACTION_STATE.to_string());

        let attraction = self.repo.create(input, true).await?;
        tracing::info!(attraction_id = attraction.id, "Attraction created");
        Ok(attraction)
    }

    async fn update_attraction(&self, id: i32, input: UpdateAttraction) -> AppResult<Attraction> {
        validate_input(&input)?;
        self.ensure_references(input.province_id, input.category_id, input.source_id)
            .await?;

        let attraction = self.repo.update(id, input).await?;
        tracing::info!(attraction_id = id, "Attraction updated");
        Ok(attraction)
    }

    async fn delete_attraction(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(attraction_id = id, "Attraction deleted");
        Ok(())
    }

    async fn restore_attraction(&self, id: i32) -> AppResult<Attraction> {
        let attraction = self.repo.restore(id).await?;
        tracing::info!(attraction_id = id, "Attraction restored");
        Ok(attraction)
    }

    async fn permanently_delete_attraction(&self, id: i32) -> AppResult<()> {
        self.repo.permanently_delete(id).await?;
        tracing::info!(attraction_id = id, "Attraction permanently deleted");
        Ok(())
    }
}
