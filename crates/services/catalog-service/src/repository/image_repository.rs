//! Image repository.
//!
//! Query functions are generic over [`ConnectionTrait`] so the same code
//! runs on the pooled connection ([`ImageStore`]) and inside a unit of work
//! transaction (`TxImageRepository`). [`ImageRepository`] only reads; every
//! write goes through the unit of work so `ImageManager` can keep the
//! principal image rule.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::base;
use super::entities::image::{self, ActiveModel, Entity as ImageEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{CreateImage, Image, ImageRelation, ListFilter, Trashed, UpdateImage};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn list(&self, filter: ListFilter, relations: &[ImageRelation]) -> AppResult<Vec<Image>>;

    async fn find_by_id(&self, id: i32, relations: &[ImageRelation]) -> AppResult<Option<Image>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Image>>;

    /// Live images of an attraction, ordered by id
    async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Vec<Image>>;
}

pub struct ImageStore {
    db: DatabaseConnection,
}

impl ImageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, mut images: Vec<Image>, relations: &[ImageRelation]) -> AppResult<Vec<Image>> {
        if relations.contains(&ImageRelation::Attraction) {
            let ids: Vec<i32> = images.iter().map(|i| i.attraction_id).collect();
            let parents = loader::attractions_by_id(&self.db, &ids).await?;
            for i in images.iter_mut() {
                i.attraction = parents.get(&i.attraction_id).cloned().map(Box::new);
            }
        }
        Ok(images)
    }
}

#[async_trait]
impl ImageRepository for ImageStore {
    async fn list(&self, filter: ListFilter, relations: &[ImageRelation]) -> AppResult<Vec<Image>> {
        let models = base::filtered(ImageEntity::find(), &filter)
            .order_by_asc(image::Column::AttractionId)
            .order_by_asc(image::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.load(models.into_iter().map(Image::from).collect(), relations)
            .await
    }

    async fn find_by_id(&self, id: i32, relations: &[ImageRelation]) -> AppResult<Option<Image>> {
        match find_live(&self.db, id).await? {
            Some(m) => Ok(self.load(vec![Image::from(m)], relations).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Image>> {
        Ok(find_any(&self.db, id).await?.map(Image::from))
    }

    async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Vec<Image>> {
        let models = live_for_attraction(&self.db, attraction_id).await?;
        Ok(models.into_iter().map(Image::from).collect())
    }
}

pub(crate) async fn find_live<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<image::Model>> {
    base::by_id::<ImageEntity>(id, Trashed::Exclude)
        .one(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn find_any<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<image::Model>> {
    ImageEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn live_for_attraction<C: ConnectionTrait>(
    db: &C,
    attraction_id: i32,
) -> AppResult<Vec<image::Model>> {
    ImageEntity::find()
        .filter(image::Column::AttractionId.eq(attraction_id))
        .filter(image::Column::DeletedAt.is_null())
        .order_by_asc(image::Column::Id)
        .all(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn count_live_principal<C: ConnectionTrait>(
    db: &C,
    attraction_id: i32,
) -> AppResult<u64> {
    ImageEntity::find()
        .filter(image::Column::AttractionId.eq(attraction_id))
        .filter(image::Column::DeletedAt.is_null())
        .filter(image::Column::IsPrincipal.eq(true))
        .count(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    input: CreateImage,
    is_principal: bool,
) -> AppResult<image::Model> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        attraction_id: Set(input.attraction_id),
        url: Set(input.url),
        description: Set(input.description),
        is_principal: Set(is_principal),
        status: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    active_model.insert(db).await.map_err(AppError::from)
}

pub(crate) async fn apply_update<C: ConnectionTrait>(
    db: &C,
    model: image::Model,
    input: UpdateImage,
) -> AppResult<image::Model> {
    let mut active: ActiveModel = model.into();
    if let Some(url) = input.url {
        active.url = Set(url);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(is_principal) = input.is_principal {
        active.is_principal = Set(is_principal);
    }
    if let Some(status) = input.status {
        active.status = Set(status);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await.map_err(AppError::from)
}

/// Unmark every principal image of the attraction except `keep`.
pub(crate) async fn clear_principal<C: ConnectionTrait>(
    db: &C,
    attraction_id: i32,
    keep: Option<i32>,
) -> AppResult<u64> {
    let mut update = ImageEntity::update_many()
        .col_expr(image::Column::IsPrincipal, Expr::value(false))
        .col_expr(image::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(image::Column::AttractionId.eq(attraction_id))
        .filter(image::Column::IsPrincipal.eq(true));
    if let Some(keep) = keep {
        update = update.filter(image::Column::Id.ne(keep));
    }

    let result = update.exec(db).await.map_err(AppError::from)?;
    Ok(result.rows_affected)
}

pub(crate) async fn set_principal_flag<C: ConnectionTrait>(
    db: &C,
    id: i32,
    is_principal: bool,
) -> AppResult<()> {
    let result = ImageEntity::update_many()
        .col_expr(image::Column::IsPrincipal, Expr::value(is_principal))
        .col_expr(image::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(image::Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
