//! Category repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::base;
use super::entities::attraction;
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{Category, CategoryRelation, CreateCategory, ListFilter, Trashed, UpdateCategory};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[CategoryRelation],
    ) -> AppResult<Vec<Category>>;

    /// Find live category by ID
    async fn find_by_id(
        &self,
        id: i32,
        relations: &[CategoryRelation],
    ) -> AppResult<Option<Category>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Category>>;

    async fn find_by_name_with_deleted(&self, name: &str) -> AppResult<Option<Category>>;

    async fn create(&self, input: CreateCategory, status: bool) -> AppResult<Category>;

    async fn update(&self, id: i32, input: UpdateCategory) -> AppResult<Category>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Category>;

    async fn permanently_delete(&self, id: i32) -> AppResult<()>;

    async fn count_attractions(&self, id: i32) -> AppResult<u64>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        mut categories: Vec<Category>,
        relations: &[CategoryRelation],
    ) -> AppResult<Vec<Category>> {
        if relations.contains(&CategoryRelation::Attractions) {
            let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
            let mut grouped =
                loader::attractions_grouped_by(&self.db, attraction::Column::CategoryId, &ids)
                    .await?;
            for c in categories.iter_mut() {
                c.attractions = Some(grouped.remove(&c.id).unwrap_or_default());
            }
        }
        Ok(categories)
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[CategoryRelation],
    ) -> AppResult<Vec<Category>> {
        let models = base::filtered(CategoryEntity::find(), &filter)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.load(models.into_iter().map(Category::from).collect(), relations)
            .await
    }

    async fn find_by_id(
        &self,
        id: i32,
        relations: &[CategoryRelation],
    ) -> AppResult<Option<Category>> {
        let model = base::by_id::<CategoryEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(self.load(vec![Category::from(m)], relations).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn find_by_name_with_deleted(&self, name: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn create(&self, input: CreateCategory, status: bool) -> AppResult<Category> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            icon: Set(input.icon),
            color: Set(input.color),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> AppResult<Category> {
        let category = base::by_id::<CategoryEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = category.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(icon) = input.icon {
            active.icon = Set(Some(icon));
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<CategoryEntity, _>(&self.db, id).await
    }

    async fn restore(&self, id: i32) -> AppResult<Category> {
        base::restore::<CategoryEntity, _>(&self.db, id).await?;
        self.find_by_id(id, &[]).await?.ok_or(AppError::NotFound)
    }

    async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<CategoryEntity, _>(&self.db, id).await
    }

    async fn count_attractions(&self, id: i32) -> AppResult<u64> {
        attraction::Entity::find()
            .filter(attraction::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
