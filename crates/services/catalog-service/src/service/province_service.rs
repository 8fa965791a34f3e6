//! Province service - validation, uniqueness and lifecycle of provinces.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{validate_input, CreateProvince, ListFilter, Province, ProvinceRelation, UpdateProvince};

use crate::repository::ProvinceRepository;

/// Province service trait for dependency injection.
#[async_trait]
pub trait ProvinceService: Send + Sync {
    async fn list_provinces(
        &self,
        filter: ListFilter,
        relations: &[ProvinceRelation],
    ) -> AppResult<Vec<Province>>;

    /// Get live province by ID
    async fn get_province(&self, id: i32, relations: &[ProvinceRelation]) -> AppResult<Province>;

    /// Get province by ID including soft-deleted
    async fn get_province_with_deleted(&self, id: i32) -> AppResult<Province>;

    async fn create_province(&self, input: CreateProvince) -> AppResult<Province>;

    async fn update_province(&self, id: i32, input: UpdateProvince) -> AppResult<Province>;

    /// Soft delete
    async fn delete_province(&self, id: i32) -> AppResult<()>;

    async fn restore_province(&self, id: i32) -> AppResult<Province>;

    /// Remove the row; refused while attractions reference it
    async fn permanently_delete_province(&self, id: i32) -> AppResult<()>;
}

pub struct ProvinceManager {
    repo: Arc<dyn ProvinceRepository>,
}

impl ProvinceManager {
    pub fn new(repo: Arc<dyn ProvinceRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_name_available(&self, name: &str, current: Option<i32>) -> AppResult<()> {
        match self.repo.find_by_name_with_deleted(name).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::conflict("Province")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ProvinceService for ProvinceManager {
    async fn list_provinces(
        &self,
        filter: ListFilter,
        relations: &[ProvinceRelation],
    ) -> AppResult<Vec<Province>> {
        self.repo.list(filter, relations).await
    }

    async fn get_province(&self, id: i32, relations: &[ProvinceRelation]) -> AppResult<Province> {
        self.repo
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_province_with_deleted(&self, id: i32) -> AppResult<Province> {
        self.repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_province(&self, input: CreateProvince) -> AppResult<Province> {
        validate_input(&input)?;
        self.ensure_name_available(&input.name, None).await?;

        let province = self.repo.create(input, true).await?;
        tracing::info!(province_id = province.id, "Province created");
        Ok(province)
    }

    async fn update_province(&self, id: i32, input: UpdateProvince) -> AppResult<Province> {
        validate_input(&input)?;
        if let Some(name) = &input.name {
            self.ensure_name_available(name, Some(id)).await?;
        }

        self.repo.update(id, input).await
    }

    async fn delete_province(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(province_id = id, "Province deleted");
        Ok(())
    }

    async fn restore_province(&self, id: i32) -> AppResult<Province> {
        self.repo.restore(id).await
    }

    async fn permanently_delete_province(&self, id: i32) -> AppResult<()> {
        if self.repo.find_by_id_with_deleted(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if self.repo.count_attractions(id).await? > 0 {
            return Err(AppError::validation(
                "Province still has attractions and cannot be removed",
            ));
        }

        self.repo.permanently_delete(id).await?;
        tracing::info!(province_id = id, "Province permanently deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::repository::MockProvinceRepository;

    fn province(id: i32, name: &str) -> Province {
        Province {
            id,
            name: name.to_string(),
            status: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
            attractions: None,
        }
    }

    #[tokio::test]
    async fn test_create_populates_active_status() {
        let mut repo = MockProvinceRepository::new();
        repo.expect_find_by_name_with_deleted()
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|input, status| input.name == "Pichincha" && *status)
            .returning(|input, status| {
                let mut p = province(1, &input.name);
                p.status = status;
                Ok(p)
            });

        let service = ProvinceManager::new(Arc::new(repo));
        let created = service
            .create_province(CreateProvince {
                name: "Pichincha".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Pichincha");
        assert!(created.status);
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflicts() {
        let mut repo = MockProvinceRepository::new();
        repo.expect_find_by_name_with_deleted()
            .returning(|name| Ok(Some(province(7, name))));
        repo.expect_create().never();

        let service = ProvinceManager::new(Arc::new(repo));
        let result = service
            .create_province(CreateProvince {
                name: "Pichincha".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let repo = MockProvinceRepository::new();
        let service = ProvinceManager::new(Arc::new(repo));

        let result = tokio_test::block_on(service.create_province(CreateProvince {
            name: String::new(),
        }));

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_keeping_own_name_is_allowed() {
        let mut repo = MockProvinceRepository::new();
        repo.expect_find_by_name_with_deleted()
            .returning(|name| Ok(Some(province(3, name))));
        repo.expect_update()
            .with(eq(3), mockall::predicate::always())
            .returning(|id, _| Ok(province(id, "Cotopaxi")));

        let service = ProvinceManager::new(Arc::new(repo));
        let updated = service
            .update_province(
                3,
                UpdateProvince {
                    name: Some("Cotopaxi".to_string()),
                    status: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, 3);
    }

    #[tokio::test]
    async fn test_get_unknown_province_not_found() {
        let mut repo = MockProvinceRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let service = ProvinceManager::new(Arc::new(repo));
        let result = service.get_province(999_999, &[]).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_permanent_delete_refused_while_referenced() {
        let mut repo = MockProvinceRepository::new();
        repo.expect_find_by_id_with_deleted()
            .with(eq(1))
            .returning(|id| Ok(Some(province(id, "Pichincha"))));
        repo.expect_count_attractions()
            .with(eq(1))
            .returning(|_| Ok(2));
        repo.expect_permanently_delete().never();

        let service = ProvinceManager::new(Arc::new(repo));
        let result = service.permanently_delete_province(1).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
