//! Contact service. An attraction has at most one live contact.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{validate_input, Contact, ContactRelation, CreateContact, ListFilter, UpdateContact};

use crate::repository::{AttractionRepository, ContactRepository};

#[async_trait]
pub trait ContactService: Send + Sync {
    async fn list_contacts(
        &self,
        filter: ListFilter,
        relations: &[ContactRelation],
    ) -> AppResult<Vec<Contact>>;

    async fn get_contact(&self, id: i32, relations: &[ContactRelation]) -> AppResult<Contact>;

    async fn get_contact_with_deleted(&self, id: i32) -> AppResult<Contact>;

    /// The live contact of a live attraction
    async fn get_contact_for_attraction(&self, attraction_id: i32) -> AppResult<Contact>;

    async fn create_contact(&self, input: CreateContact) -> AppResult<Contact>;

    async fn update_contact(&self, id: i32, input: UpdateContact) -> AppResult<Contact>;

    async fn delete_contact(&self, id: i32) -> AppResult<()>;

    async fn restore_contact(&self, id: i32) -> AppResult<Contact>;

    async fn permanently_delete_contact(&self, id: i32) -> AppResult<()>;
}

pub struct ContactManager {
    repo: Arc<dyn ContactRepository>,
    attractions: Arc<dyn AttractionRepository>,
}

impl ContactManager {
    pub fn new(
        repo: Arc<dyn ContactRepository>,
        attractions: Arc<dyn AttractionRepository>,
    ) -> Self {
        Self { repo, attractions }
    }
}

#[async_trait]
impl ContactService for ContactManager {
    async fn list_contacts(
        &self,
        filter: ListFilter,
        relations: &[ContactRelation],
    ) -> AppResult<Vec<Contact>> {
        self.repo.list(filter, relations).await
    }

    async fn get_contact(&self, id: i32, relations: &[ContactRelation]) -> AppResult<Contact> {
        self.repo
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_contact_with_deleted(&self, id: i32) -> AppResult<Contact> {
        self.repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_contact_for_attraction(&self, attraction_id: i32) -> AppResult<Contact> {
        if self.attractions.find_by_id(attraction_id, &[]).await?.is_none() {
            return Err(AppError::NotFound);
        }

        self.repo
            .find_by_attraction(attraction_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_contact(&self, input: CreateContact) -> AppResult<Contact> {
        validate_input(&input)?;
        if self
            .attractions
            .find_by_id(input.attraction_id, &[])
            .await?
            .is_none()
        {
            return Err(AppError::validation(format!(
                "Attraction {} does not exist",
                input.attraction_id
            )));
        }
        if self
            .repo
            .find_by_attraction(input.attraction_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Contact for this attraction"));
        }

        let contact = self
            .repo
            .create(input, true)
            .await
            .map_err(second_live_contact)?;
        tracing::info!(
            contact_id = contact.id,
            attraction_id = contact.attraction_id,
            "Contact created"
        );
        Ok(contact)
    }

    async fn update_contact(&self, id: i32, input: UpdateContact) -> AppResult<Contact> {
        validate_input(&input)?;
        self.repo.update(id, input).await
    }

    async fn delete_contact(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }

    async fn restore_contact(&self, id: i32) -> AppResult<Contact> {
        let contact = self
            .repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Restoring would leave two live contacts
        if let Some(live) = self.repo.find_by_attraction(contact.attraction_id).await? {
            if live.id != id {
                return Err(AppError::conflict("Contact for this attraction"));
            }
        }

        self.repo.restore(id).await.map_err(second_live_contact)
    }

    async fn permanently_delete_contact(&self, id: i32) -> AppResult<()> {
        self.repo.permanently_delete(id).await
    }
}

/// A concurrent writer got its contact in first; the unique index said no.
fn second_live_contact(err: AppError) -> AppError {
    if err.is_unique_violation() {
        AppError::conflict("Contact for this attraction")
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{Attraction, ImportanceLevel};

    use crate::repository::{MockAttractionRepository, MockContactRepository};

    fn attraction(id: i32) -> Attraction {
        Attraction {
            id,
            name: "Quilotoa".to_string(),
            description: "Crater lake".to_string(),
            province_id: 1,
            category_id: 1,
            source_id: 1,
            latitude: -0.8598,
            longitude: -78.9013,
            address: "Zumbahua".to_string(),
            importance: ImportanceLevel::Medium,
            state: "Activo".to_string(),
            status: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
            province: None,
            category: None,
            source: None,
            contact: None,
            images: None,
            tags: None,
        }
    }

    fn contact(id: i32, attraction_id: i32) -> Contact {
        Contact {
            id,
            attraction_id,
            phone: Some("+593 3 000 0000".to_string()),
            email: None,
            website: None,
            status: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
            attraction: None,
        }
    }

    #[tokio::test]
    async fn test_second_contact_conflicts() {
        let mut attractions = MockAttractionRepository::new();
        attractions
            .expect_find_by_id()
            .returning(|id, _| Ok(Some(attraction(id))));
        let mut repo = MockContactRepository::new();
        repo.expect_find_by_attraction()
            .returning(|attraction_id| Ok(Some(contact(1, attraction_id))));
        repo.expect_create().never();

        let service = ContactManager::new(Arc::new(repo), Arc::new(attractions));
        let result = service
            .create_contact(CreateContact {
                attraction_id: 5,
                phone: None,
                email: Some("info@quilotoa.ec".to_string()),
                website: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_contact_for_unknown_attraction_fails_validation() {
        let mut attractions = MockAttractionRepository::new();
        attractions.expect_find_by_id().returning(|_, _| Ok(None));
        let mut repo = MockContactRepository::new();
        repo.expect_create().never();

        let service = ContactManager::new(Arc::new(repo), Arc::new(attractions));
        let result = service
            .create_contact(CreateContact {
                attraction_id: 404,
                phone: None,
                email: None,
                website: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
