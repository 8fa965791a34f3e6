//! Province repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::base;
use super::entities::attraction;
use super::entities::province::{self, ActiveModel, Entity as ProvinceEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{CreateProvince, ListFilter, Province, ProvinceRelation, Trashed, UpdateProvince};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Province repository trait for dependency injection.
///
/// Query methods exclude soft-deleted rows unless a [`Trashed`] scope
/// says otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProvinceRepository: Send + Sync {
    /// List provinces matching the filter, ordered by name
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[ProvinceRelation],
    ) -> AppResult<Vec<Province>>;

    /// Find live province by ID
    async fn find_by_id(
        &self,
        id: i32,
        relations: &[ProvinceRelation],
    ) -> AppResult<Option<Province>>;

    /// Find province by ID including soft-deleted
    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Province>>;

    /// Find province by exact name including soft-deleted
    async fn find_by_name_with_deleted(&self, name: &str) -> AppResult<Option<Province>>;

    async fn create(&self, input: CreateProvince, status: bool) -> AppResult<Province>;

    /// Update a live province
    async fn update(&self, id: i32, input: UpdateProvince) -> AppResult<Province>;

    /// Soft delete (sets deleted_at)
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Clear deleted_at on a soft-deleted province
    async fn restore(&self, id: i32) -> AppResult<Province>;

    /// Remove the row
    async fn permanently_delete(&self, id: i32) -> AppResult<()>;

    /// Number of attractions (live or trashed) referencing the province
    async fn count_attractions(&self, id: i32) -> AppResult<u64>;
}

/// Concrete implementation of ProvinceRepository
pub struct ProvinceStore {
    db: DatabaseConnection,
}

impl ProvinceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        mut provinces: Vec<Province>,
        relations: &[ProvinceRelation],
    ) -> AppResult<Vec<Province>> {
        if relations.contains(&ProvinceRelation::Attractions) {
            let ids: Vec<i32> = provinces.iter().map(|p| p.id).collect();
            let mut grouped =
                loader::attractions_grouped_by(&self.db, attraction::Column::ProvinceId, &ids)
                    .await?;
            for p in provinces.iter_mut() {
                p.attractions = Some(grouped.remove(&p.id).unwrap_or_default());
            }
        }
        Ok(provinces)
    }

    async fn find_one(&self, id: i32, relations: &[ProvinceRelation]) -> AppResult<Option<Province>> {
        let model = base::by_id::<ProvinceEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(self.load(vec![Province::from(m)], relations).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProvinceRepository for ProvinceStore {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[ProvinceRelation],
    ) -> AppResult<Vec<Province>> {
        let models = base::filtered(ProvinceEntity::find(), &filter)
            .order_by_asc(province::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.load(models.into_iter().map(Province::from).collect(), relations)
            .await
    }

    async fn find_by_id(
        &self,
        id: i32,
        relations: &[ProvinceRelation],
    ) -> AppResult<Option<Province>> {
        self.find_one(id, relations).await
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Province>> {
        let result = ProvinceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Province::from))
    }

    async fn find_by_name_with_deleted(&self, name: &str) -> AppResult<Option<Province>> {
        let result = ProvinceEntity::find()
            .filter(province::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Province::from))
    }

    async fn create(&self, input: CreateProvince, status: bool) -> AppResult<Province> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(input.name),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Province::from(model))
    }

    async fn update(&self, id: i32, input: UpdateProvince) -> AppResult<Province> {
        let province = base::by_id::<ProvinceEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = province.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Province::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<ProvinceEntity, _>(&self.db, id).await
    }

    async fn restore(&self, id: i32) -> AppResult<Province> {
        base::restore::<ProvinceEntity, _>(&self.db, id).await?;
        self.find_one(id, &[]).await?.ok_or(AppError::NotFound)
    }

    async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<ProvinceEntity, _>(&self.db, id).await
    }

    async fn count_attractions(&self, id: i32) -> AppResult<u64> {
        attraction::Entity::find()
            .filter(attraction::Column::ProvinceId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
