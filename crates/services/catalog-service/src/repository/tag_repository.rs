//! Tag repository, including the attraction <-> tag association.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::base;
use super::entities::attraction_tag;
use super::entities::tag::{self, ActiveModel, Entity as TagEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{CreateTag, ListFilter, Tag, TagRelation, Trashed, UpdateTag};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn list(&self, filter: ListFilter, relations: &[TagRelation]) -> AppResult<Vec<Tag>>;

    async fn find_by_id(&self, id: i32, relations: &[TagRelation]) -> AppResult<Option<Tag>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Tag>>;

    async fn find_by_name_with_deleted(&self, name: &str) -> AppResult<Option<Tag>>;

    /// Live tags associated with an attraction, ordered by name
    async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Vec<Tag>>;

    async fn create(&self, input: CreateTag) -> AppResult<Tag>;

    async fn update(&self, id: i32, input: UpdateTag) -> AppResult<Tag>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Tag>;

    async fn permanently_delete(&self, id: i32) -> AppResult<()>;

    /// Associate a tag with an attraction. Existing pairs are left alone.
    async fn attach(&self, attraction_id: i32, tag_id: i32) -> AppResult<()>;

    /// Remove an association. Missing pairs are ignored.
    async fn detach(&self, attraction_id: i32, tag_id: i32) -> AppResult<()>;
}

pub struct TagStore {
    db: DatabaseConnection,
}

impl TagStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, mut tags: Vec<Tag>, relations: &[TagRelation]) -> AppResult<Vec<Tag>> {
        if relations.contains(&TagRelation::Attractions) {
            let ids: Vec<i32> = tags.iter().map(|t| t.id).collect();
            let mut grouped = loader::attractions_by_tag(&self.db, &ids).await?;
            for t in tags.iter_mut() {
                t.attractions = Some(grouped.remove(&t.id).unwrap_or_default());
            }
        }
        Ok(tags)
    }
}

#[async_trait]
impl TagRepository for TagStore {
    async fn list(&self, filter: ListFilter, relations: &[TagRelation]) -> AppResult<Vec<Tag>> {
        let models = base::filtered(TagEntity::find(), &filter)
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.load(models.into_iter().map(Tag::from).collect(), relations)
            .await
    }

    async fn find_by_id(&self, id: i32, relations: &[TagRelation]) -> AppResult<Option<Tag>> {
        let model = base::by_id::<TagEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(self.load(vec![Tag::from(m)], relations).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Tag>> {
        let result = TagEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Tag::from))
    }

    async fn find_by_name_with_deleted(&self, name: &str) -> AppResult<Option<Tag>> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Tag::from))
    }

    async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Vec<Tag>> {
        let models = TagEntity::find()
            .inner_join(attraction_tag::Entity)
            .filter(attraction_tag::Column::AttractionId.eq(attraction_id))
            .filter(tag::Column::DeletedAt.is_null())
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Tag::from).collect())
    }

    async fn create(&self, input: CreateTag) -> AppResult<Tag> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Tag::from(model))
    }

    async fn update(&self, id: i32, input: UpdateTag) -> AppResult<Tag> {
        let tag = base::by_id::<TagEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = tag.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Tag::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<TagEntity, _>(&self.db, id).await
    }

    async fn restore(&self, id: i32) -> AppResult<Tag> {
        base::restore::<TagEntity, _>(&self.db, id).await?;
        self.find_by_id(id, &[]).await?.ok_or(AppError::NotFound)
    }

    async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<TagEntity, _>(&self.db, id).await
    }

    async fn attach(&self, attraction_id: i32, tag_id: i32) -> AppResult<()> {
        let link = attraction_tag::ActiveModel {
            attraction_id: Set(attraction_id),
            tag_id: Set(tag_id),
        };

        attraction_tag::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    attraction_tag::Column::AttractionId,
                    attraction_tag::Column::TagId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn detach(&self, attraction_id: i32, tag_id: i32) -> AppResult<()> {
        attraction_tag::Entity::delete_many()
            .filter(attraction_tag::Column::AttractionId.eq(attraction_id))
            .filter(attraction_tag::Column::TagId.eq(tag_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
