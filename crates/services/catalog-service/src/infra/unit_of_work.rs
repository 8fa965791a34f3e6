//! Unit of Work for the catalog.
//!
//! The principal image rule spans several rows, so every image write runs
//! through [`UnitOfWork::transaction`]: the closure receives a
//! [`TransactionContext`] whose repositories all share one database
//! transaction, committed on `Ok` and rolled back on `Err`. Image writes
//! first lock the parent attraction row, which serializes them per
//! attraction under ReadCommitted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel,
    QuerySelect, TransactionTrait,
};

use crate::repository::image_repository as images;
use crate::repository::{base, entities, ImageRepository, ImageStore};
use common::{AppError, AppResult};
use domain::{CreateImage, Image, UpdateImage};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method.
/// Image service behaviour is covered by integration tests instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Read-only image repository on the pooled connection
    fn images(&self) -> Arc<dyn ImageRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed on success, rolled back on error. Uses ReadCommitted.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Image repository for this transaction
    pub fn images(&self) -> TxImageRepository<'_> {
        TxImageRepository::new(self.txn)
    }

    /// Lock the attraction row (trashed or not) until the transaction ends.
    ///
    /// Image writes of one attraction queue on this lock, so each sees the
    /// principal flags the previous one committed. `None` when no such row.
    pub async fn lock_attraction(&self, id: i32) -> AppResult<Option<entities::attraction::Model>> {
        entities::attraction::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(AppError::from)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    image_repo: Arc<ImageStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let image_repo = Arc::new(ImageStore::new(db.clone()));
        Self { db, image_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn images(&self) -> Arc<dyn ImageRepository> {
        self.image_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware image repository.
///
/// Low-level row operations only; the principal image rule is applied by
/// `ImageManager` on top of these.
pub struct TxImageRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxImageRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find live image by ID
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Image>> {
        Ok(images::find_live(self.txn, id).await?.map(Image::from))
    }

    /// Find image by ID including soft-deleted
    pub async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Image>> {
        Ok(images::find_any(self.txn, id).await?.map(Image::from))
    }

    /// Live images of an attraction, ordered by id
    pub async fn find_by_attraction(&self, attraction_id: i32) -> AppResult<Vec<Image>> {
        let models = images::live_for_attraction(self.txn, attraction_id).await?;
        Ok(models.into_iter().map(Image::from).collect())
    }

    /// Whether the attraction currently has a live principal image
    pub async fn has_principal(&self, attraction_id: i32) -> AppResult<bool> {
        Ok(images::count_live_principal(self.txn, attraction_id).await? > 0)
    }

    pub async fn create(&self, input: CreateImage, is_principal: bool) -> AppResult<Image> {
        let model = images::insert(self.txn, input, is_principal).await?;
        Ok(Image::from(model))
    }

    /// Update a live image
    pub async fn update(&self, id: i32, input: UpdateImage) -> AppResult<Image> {
        let model = images::find_live(self.txn, id)
            .await?
            .ok_or(AppError::NotFound)?;
        let model = images::apply_update(self.txn, model, input).await?;
        Ok(Image::from(model))
    }

    /// Unmark every principal image of the attraction except `keep`
    pub async fn clear_principal(&self, attraction_id: i32, keep: Option<i32>) -> AppResult<u64> {
        images::clear_principal(self.txn, attraction_id, keep).await
    }

    pub async fn mark_principal(&self, id: i32, is_principal: bool) -> AppResult<()> {
        images::set_principal_flag(self.txn, id, is_principal).await
    }

    /// Soft delete (sets deleted_at)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<entities::image::Entity, _>(self.txn, id).await
    }

    /// Clear deleted_at on a soft-deleted image
    pub async fn restore(&self, id: i32) -> AppResult<()> {
        base::restore::<entities::image::Entity, _>(self.txn, id).await
    }

    /// Remove the row
    pub async fn permanently_delete(&self, id: i32) -> AppResult<()> {
        base::permanently_delete::<entities::image::Entity, _>(self.txn, id).await
    }
}
