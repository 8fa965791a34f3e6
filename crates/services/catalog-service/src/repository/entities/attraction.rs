//! Attraction database entity.

use sea_orm::entity::prelude::*;

use domain::Attraction;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attractions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub province_id: i32,
    pub category_id: i32,
    pub source_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    /// One of `low`, `medium`, `high`
    pub importance: String,
    pub state: String,
    pub status: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::province::Entity",
        from = "Column::ProvinceId",
        to = "super::province::Column::Id"
    )]
    Province,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::source::Entity",
        from = "Column::SourceId",
        to = "super::source::Column::Id"
    )]
    Source,
    #[sea_orm(has_many = "super::contact::Entity")]
    Contact,
    #[sea_orm(has_many = "super::image::Entity")]
    Image,
    #[sea_orm(has_many = "super::attraction_tag::Entity")]
    AttractionTag,
}

impl Related<super::province::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Province.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl Related<super::attraction_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttractionTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::attraction_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::attraction_tag::Relation::Attraction.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity (relations not loaded)
impl From<Model> for Attraction {
    fn from(model: Model) -> Self {
        Attraction {
            id: model.id,
            name: model.name,
            description: model.description,
            province_id: model.province_id,
            category_id: model.category_id,
            source_id: model.source_id,
            latitude: model.latitude,
            longitude: model.longitude,
            address: model.address,
            importance: model.importance.parse().unwrap_or_default(),
            state: model.state,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            province: None,
            category: None,
            source: None,
            contact: None,
            images: None,
            tags: None,
        }
    }
}
