//! Contact repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::base;
use super::entities::contact::{self, ActiveModel, Entity as ContactEntity};
use super::loader;
use common::{AppError, AppResult};
use domain::{Contact, ContactRelation, CreateContact, ListFilter, Trashed, UpdateContact};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[ContactRelation],
    ) -> AppResult<Vec<Contact>>;

    async fn find_by_id(
        &self,
        id: i32,
        relations: &[ContactRelation],
    ) -> AppResult<Option<Contact>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Contact>>;

    /// The live contact of an attraction, if any
    async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Option<Contact>>;

    async fn create(&self, input: CreateContact, status: bool) -> AppResult<Contact>;

    async fn update(&self, id: i32, input: UpdateContact) -> AppResult<Contact>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Contact>;

    async fn permanently_delete(&self, id: i32) -> AppResult<()>;
}

pub struct ContactStore {
    db: DatabaseConnection,
}

impl ContactStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        mut contacts: Vec<Contact>,
        relations: &[ContactRelation],
    ) -> AppResult<Vec<Contact>> {
        if relations.contains(&ContactRelation::Attraction) {
            let ids: Vec<i32> = contacts.iter().map(|c| c.attraction_id).collect();
            let parents = loader::attractions_by_id(&self.db, &ids).await?;
            for c in contacts.iter_mut() {
                c.attraction = parents.get(&c.attraction_id).cloned().map(Box::new);
            }
        }
        Ok(contacts)
    }
}

#[async_trait]
impl ContactRepository for ContactStore {
    async fn list(
        &self,
        filter: ListFilter,
        relations: &[ContactRelation],
    ) -> AppResult<Vec<Contact>> {
        let models = base::filtered(ContactEntity::find(), &filter)
            .order_by_asc(contact::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.load(models.into_iter().map(Contact::from).collect(), relations)
            .await
    }

    async fn find_by_id(
        &self,
        id: i32,
        relations: &[ContactRelation],
    ) -> AppResult<Option<Contact>> {
        let model = base::by_id::<ContactEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(self.load(vec![Contact::from(m)], relations).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Contact>> {
        let result = ContactEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Contact::from))
    }

    async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Option<Contact>> {
        let result = ContactEntity::find()
            .filter(contact::Column::AttractionId.eq(attraction_id))
            .filter(contact::Column::DeletedAt.is_null())
            .order_by_asc(contact::Column::Id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Contact::from))
    }

    async fn create(&self, input: CreateContact, status: bool) -> AppResult<Contact> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            attraction_id: Set(input.attraction_id),
            phone: Set(input.phone),
            email: Set(input.email),
            website: Set(input.website),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Contact::from(model))
    }

    async fn update(&self, id: i32, input: UpdateContact) -> AppResult<Contact> {
        let contact = base::by_id::<ContactEntity>(id, Trashed::Exclude)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = contact.into();
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Contact::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<ContactEntity, _>(&self.db, id).await
    }

    async fn restore(&self, id: i32) -> AppResult<Contact> {
        base::restore::<ContactEntity, _>(&self.db, id).await?;
        self.find_by_id(id, &[]).await?.ok_or(AppError::NotFound)
    }

    async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<ContactEntity, _>(&self.db, id).await
    }
}
