//! Attraction repository with soft delete and eager loading.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::base;
use super::entities::attraction::{self, ActiveModel, Entity as AttractionEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{
    Attraction, AttractionRelation, CreateAttraction, ListFilter, Trashed, UpdateAttraction,
    DEFAULT_ATTRACTION_STATE,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// `LOWER(attractions.<column>)`
fn lower(column: attraction::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((AttractionEntity, column))))
}

/// Lower-cased `%term%` with the LIKE wildcards in `term` escaped.
fn like_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    LikeExpr::new(format!("%{}%", escaped)).escape('\\')
}

/// Attraction repository trait for dependency injection.
///
/// Every read takes the relations to eager-load; each one costs a single
/// extra query for the whole result set.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttractionRepository: Send + Sync {
    /// List attractions matching the filter, ordered by name
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>>;

    /// Find live attraction by ID
    async fn find_by_id(
        &self,
        id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Option<Attraction>>;

    /// Find attraction by ID including soft-deleted
    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Attraction>>;

    /// Active attractions of a province
    async fn find_by_province(
        &self,
        province_id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>>;

    /// Active attractions of a category
    async fn find_by_category(
        &self,
        category_id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>>;

    /// Active attractions whose name or description contains `term`
    async fn search(
        &self,
        term: &str,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>>;

    async fn create(&self, input: CreateAttraction, status: bool) -> AppResult<Attraction>;

    async fn update(&self, id: i32, input: UpdateAttraction) -> AppResult<Attraction>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Attraction>;

    /// Remove the row; contacts, images and tag links go with it
    async fn permanently_delete(&self, id: i32) -> AppResult<()>;
}

pub struct AttractionStore {
    db: DatabaseConnection,
}

impl AttractionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(
        &self,
        select: Select<AttractionEntity>,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>> {
        let models = select
            .order_by_asc(attraction::Column::Name)
            .order_by_asc(attraction::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut attractions: Vec<Attraction> = models.into_iter().map(Attraction::from).collect();
        loader::load_attraction_relations(&self.db, &mut attractions, relations).await?;
        Ok(attractions)
    }

    fn active() -> Select<AttractionEntity> {
        base::filtered(AttractionEntity::find(), &ListFilter::active())
    }
}

#[async_trait]
impl AttractionRepository for AttractionStore {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>> {
        self.fetch(base::filtered(AttractionEntity::find(), &filter), relations)
            .await
    }

    async fn find_by_id(
        &self,
        id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Option<Attraction>> {
        let model = base::by_id::<AttractionEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let mut found = [Attraction::from(model)];
        loader::load_attraction_relations(&self.db, &mut found, relations).await?;
        let [attraction] = found;
        Ok(Some(attraction))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Attraction>> {
        let result = AttractionEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Attraction::from))
    }

    async fn find_by_province(
        &self,
        province_id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>> {
        let select = Self::active().filter(attraction::Column::ProvinceId.eq(province_id));
        self.fetch(select, relations).await
    }

    async fn find_by_category(
        &self,
        category_id: i32,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>> {
        let select = Self::active().filter(attraction::Column::CategoryId.eq(category_id));
        self.fetch(select, relations).await
    }

    async fn search(
        &self,
        term: &str,
        relations: &[AttractionRelation],
    ) -> AppResult<Vec<Attraction>> {
        let pattern = like_pattern(term);
        let select = Self::active().filter(
            Condition::any()
                .add(lower(attraction::Column::Name).like(pattern.clone()))
                .add(lower(attraction::Column::Description).like(pattern)),
        );
        self.fetch(select, relations).await
    }

    async fn create(&self, input: CreateAttraction, status: bool) -> AppResult<Attraction> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            province_id: Set(input.province_id),
            category_id: Set(input.category_id),
            source_id: Set(input.source_id),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            address: Set(input.address),
            importance: Set(input.importance.as_str().to_string()),
            state: Set(input
                .state
                .unwrap_or_else(|| DEFAULT_ATTRACTION_STATE.to_string())),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Attraction::from(model))
    }

    async fn update(&self, id: i32, input: UpdateAttraction) -> AppResult<Attraction> {
        let attraction = base::by_id::<AttractionEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = attraction.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(province_id) = input.province_id {
            active.province_id = Set(province_id);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(source_id) = input.source_id {
            active.source_id = Set(source_id);
        }
        if let Some(latitude) = input.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = input.longitude {
            active.longitude = Set(longitude);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(importance) = input.importance {
            active.importance = Set(importance.as_str().to_string());
        }
        if let Some(state) = input.state {
            active.state = Set(state);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Attraction::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<AttractionEntity, _>(&self.db, id).await
    }

    async fn restore(&self, id: i32) -> AppResult<Attraction> {
        base::restore::<AttractionEntity, _>(&self.db, id).await?;
        self.find_by_id(id, &[]).await?.ok_or(AppError::NotFound)
    }

    async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<AttractionEntity, _>(&self.db, id).await
    }
}
