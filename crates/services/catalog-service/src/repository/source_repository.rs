//! Source repository with soft delete support.
//!
//! Sources carry no `status` flag, so a status filter is ignored.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::base;
use super::entities::attraction;
use super::entities::source::{self, ActiveModel, Entity as SourceEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{CreateSource, ListFilter, Source, SourceRelation, Trashed, UpdateSource};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn list(&self, filter: ListFilter, relations: &[SourceRelation])
        -> AppResult<Vec<Source>>;

    async fn find_by_id(&self, id: i32, relations: &[SourceRelation]) -> AppResult<Option<Source>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Source>>;

    async fn create(&self, input: CreateSource) -> AppResult<Source>;

    async fn update(&self, id: i32, input: UpdateSource) -> AppResult<Source>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Source>;

    async fn permanently_delete(&self, id: i32) -> AppResult<()>;

    async fn count_attractions(&self, id: i32) -> AppResult<u64>;
}

pub struct SourceStore {
    db: DatabaseConnection,
}

impl SourceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        mut sources: Vec<Source>,
        relations: &[SourceRelation],
    ) -> AppResult<Vec<Source>> {
        if relations.contains(&SourceRelation::Attractions) {
            let ids: Vec<i32> = sources.iter().map(|s| s.id).collect();
            let mut grouped =
                loader::attractions_grouped_by(&self.db, attraction::Column::SourceId, &ids)
                    .await?;
            for s in sources.iter_mut() {
                s.attractions = Some(grouped.remove(&s.id).unwrap_or_default());
            }
        }
        Ok(sources)
    }
}

#[async_trait]
impl SourceRepository for SourceStore {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[SourceRelation],
    ) -> AppResult<Vec<Source>> {
        let models = base::filtered(SourceEntity::find(), &filter)
            .order_by_desc(source::Column::ObtainedOn)
            .order_by_asc(source::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.load(models.into_iter().map(Source::from).collect(), relations)
            .await
    }

    async fn find_by_id(&self, id: i32, relations: &[SourceRelation]) -> AppResult<Option<Source>> {
        let model = base::by_id::<SourceEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(self.load(vec![Source::from(m)], relations).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Source>> {
        let result = SourceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Source::from))
    }

    async fn create(&self, input: CreateSource) -> AppResult<Source> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(input.name),
            url: Set(input.url),
            obtained_on: Set(input.obtained_on),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Source::from(model))
    }

    async fn update(&self, id: i32, input: UpdateSource) -> AppResult<Source> {
        let source = base::by_id::<SourceEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = source.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(url) = input.url {
            active.url = Set(Some(url));
        }
        if let Some(obtained_on) = input.obtained_on {
            active.obtained_on = Set(obtained_on);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Source::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<SourceEntity, _>(&self.db, id).await
    }

    async fn restore(&self, id: i32) -> AppResult<Source> {
        base::restore::<SourceEntity, _>(&self.db, id).await?;
        self.find_by_id(id, &[]).await?.ok_or(AppError::NotFound)
    }

    async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<SourceEntity, _>(&self.db, id).await
    }

    async fn count_attractions(&self, id: i32) -> AppResult<u64> {
        attraction::Entity::find()
            .filter(attraction::Column::SourceId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
