//! Token store backed by `auth_tokens`.
//!
//! A token is honoured only while its row exists, so revoking is a delete.
//! The free functions take any connection and are shared with the
//! transactional repository in `infra::unit_of_work`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::auth_token::{self, ActiveModel, Entity as TokenEntity};
use common::{AppError, AppResult};
use domain::{AuthToken, TokenKind};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stored record for a token id, if not revoked
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuthToken>>;

    /// Store a new token record outside any rotation
    async fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> AppResult<AuthToken>;

    /// Revoke every token of a user; returns how many were removed
    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64>;

    /// Revoke one token; false when it was already gone
    async fn revoke(&self, id: Uuid) -> AppResult<bool>;

    /// Drop records whose expiry has passed
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct TokenStore {
    db: DatabaseConnection,
}

impl TokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenRepository for TokenStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuthToken>> {
        find(&self.db, id).await
    }

    async fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> AppResult<AuthToken> {
        insert(&self.db, user_id, kind, expires_at).await
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        revoke_all(&self.db, user_id).await
    }

    async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        revoke(&self.db, id).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = TokenEntity::delete_many()
            .filter(auth_token::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected)
    }
}

pub(crate) async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<AuthToken>> {
    TokenEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?
        .map(AuthToken::try_from)
        .transpose()
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    kind: TokenKind,
    expires_at: DateTime<Utc>,
) -> AppResult<AuthToken> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        kind: Set(kind.as_str().to_string()),
        expires_at: Set(expires_at),
        created_at: Set(Utc::now()),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    AuthToken::try_from(model)
}

pub(crate) async fn revoke_all<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<u64> {
    let result = TokenEntity::delete_many()
        .filter(auth_token::Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(AppError::from)?;
    Ok(result.rows_affected)
}

pub(crate) async fn revoke<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<bool> {
    let result = TokenEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(AppError::from)?;
    Ok(result.rows_affected > 0)
}
