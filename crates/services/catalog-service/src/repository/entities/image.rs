//! Attraction image database entity.

use sea_orm::entity::prelude::*;

use domain::Image;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attraction_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub attraction_id: i32,
    pub url: String,
    pub description: Option<String>,
    pub is_principal: bool,
    pub status: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attraction::Entity",
        from = "Column::AttractionId",
        to = "super::attraction::Column::Id",
        on_delete = "Cascade"
    )]
    Attraction,
}

impl Related<super::attraction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attraction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Image {
    fn from(model: Model) -> Self {
        Image {
            id: model.id,
            attraction_id: model.attraction_id,
            url: model.url,
            description: model.description,
            is_principal: model.is_principal,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            attraction: None,
        }
    }
}
