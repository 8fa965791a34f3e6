//! Unit of Work for token rotation.
//!
//! Login revokes the previous tokens and issues a new pair; refresh
//! consumes one token and issues a pair. Both run through
//! [`UnitOfWork::transaction`] so a failure leaves the token store as it was.
//! Each rotation first locks the user row, which serializes rotations of
//! one user under ReadCommitted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::repository::token_repository as tokens;
use crate::repository::{entities, TokenRepository, TokenStore};
use common::{AppError, AppResult};
use domain::{AuthToken, TokenKind};

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Non-transactional token repository for reads and single writes
    fn tokens(&self) -> Arc<dyn TokenRepository>;

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

    /// Token repository for this transaction
    pub fn tokens(&self) -> TxTokenRepository<'_> {
        TxTokenRepository { txn: self.txn }
    }

    /// Lock the user row until the transaction ends.
    ///
    /// Token rotations of one user queue here, so a revoke sees every pair
    /// an earlier rotation committed. False when the user is gone.
    pub async fn lock_user(&self, user_id: Uuid) -> AppResult<bool> {
        let user = entities::user::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(AppError::from)?;
        Ok(user.is_some())
    }
}

/// Transaction-aware token repository.
pub struct TxTokenRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxTokenRepository<'_> {
    /// Store a new token record
    pub async fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> AppResult<AuthToken> {
        tokens::insert(self.txn, user_id, kind, expires_at).await
    }

    pub async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        tokens::revoke_all(self.txn, user_id).await
    }

    /// Remove one record; false when another caller already did
    pub async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        tokens::revoke(self.txn, id).await
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    token_repo: Arc<TokenStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let token_repo = Arc::new(TokenStore::new(db.clone()));
        Self { db, token_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn tokens(&self) -> Arc<dyn TokenRepository> {
        self.token_repo.clone()
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
