//! Issued token record. The primary key is the JWT `jti`.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{AuthToken, TokenKind};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// "access" or "refresh"
    pub kind: String,
    pub expires_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for AuthToken {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind: TokenKind = model.kind.parse()?;
        Ok(AuthToken {
            id: model.id,
            user_id: model.user_id,
            kind,
            expires_at: model.expires_at,
            created_at: model.created_at,
        })
    }
}
