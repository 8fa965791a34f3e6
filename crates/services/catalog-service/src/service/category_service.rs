//! Category service.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{validate_input, Category, CategoryRelation, CreateCategory, ListFilter, UpdateCategory};

use crate::repository::CategoryRepository;

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list_categories(
        &self,
        filter: ListFilter,
        relations: &[CategoryRelation],
    ) -> AppResult<Vec<Category>>;

    async fn get_category(&self, id: i32, relations: &[CategoryRelation]) -> AppResult<Category>;

    async fn get_category_with_deleted(&self, id: i32) -> AppResult<Category>;

    async fn create_category(&self, input: CreateCategory) -> AppResult<Category>;

    async fn update_category(&self, id: i32, input: UpdateCategory) -> AppResult<Category>;

    async fn delete_category(&self, id: i32) -> AppResult<()>;

    async fn restore_category(&self, id: i32) -> AppResult<Category>;

    async fn permanently_delete_category(&self, id: i32) -> AppResult<()>;
}

pub struct CategoryManager {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryManager {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn list_categories(
        &self,
        filter: ListFilter,
        relations: &[CategoryRelation],
    ) -> AppResult<Vec<Category>> {
        self.repo.list(filter, relations).await
    }

    async fn get_category(&self, id: i32, relations: &[CategoryRelation]) -> AppResult<Category> {
        self.repo
            .find_by_id(id, relations)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_category_with_deleted(&self, id: i32) -> AppResult<Category> {
        self.repo
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_category(&self, input: CreateCategory) -> AppResult<Category> {
        validate_input(&input)?;
        if self.repo.find_by_name_with_deleted(&input.name).await?.is_some() {
            return Err(AppError::conflict("Category"));
        }

        let category = self.repo.create(input, true).await?;
        tracing::info!(category_id = category.id, "Category created");
        Ok(category)
    }

    async fn update_category(&self, id: i32, input: UpdateCategory) -> AppResult<Category> {
        validate_input(&input)?;
        if let Some(name) = &input.name {
            if let Some(existing) = self.repo.find_by_name_with_deleted(name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Category"));
                }
            }
        }

        self.repo.update(id, input).await
    }

    async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    async fn restore_category(&self, id: i32) -> AppResult<Category> {
        self.repo.restore(id).await
    }

    async fn permanently_delete_category(&self, id: i32) -> AppResult<()> {
        if self.repo.find_by_id_with_deleted(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if self.repo.count_attractions(id).await? > 0 {
            return Err(AppError::validation(
                "Category still has attractions and cannot be removed",
            ));
        }

        self.repo.permanently_delete(id).await?;
        tracing::info!(category_id = id, "Category permanently deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::repository::MockCategoryRepository;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
            icon: None,
            color: Some("#FF8800".to_string()),
            status: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
            attractions: None,
        }
    }

    #[tokio::test]
    async fn test_invalid_color_never_reaches_repository() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name_with_deleted().never();
        repo.expect_create().never();

        let service = CategoryManager::new(Arc::new(repo));
        let result = service
            .create_category(CreateCategory {
                name: "Aventura".to_string(),
                description: None,
                icon: None,
                color: Some("orange".to_string()),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_conflicts() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name_with_deleted()
            .returning(|name| Ok(Some(category(2, name))));
        repo.expect_update().never();

        let service = CategoryManager::new(Arc::new(repo));
        let result = service
            .update_category(
                1,
                UpdateCategory {
                    name: Some("Aventura".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
