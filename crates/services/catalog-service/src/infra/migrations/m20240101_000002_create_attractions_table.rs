//! Migration: attractions table.
//!
//! Province, category and source references are restricted on delete: a
//! lookup row cannot be removed while attractions still point at it.

use sea_orm_migration::prelude::*;

use super::{deleted_at, deleted_at_index, timestamp};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attractions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attractions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attractions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Attractions::Description).text().not_null())
                    .col(ColumnDef::new(Attractions::ProvinceId).integer().not_null())
                    .col(ColumnDef::new(Attractions::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Attractions::SourceId).integer().not_null())
                    .col(ColumnDef::new(Attractions::Latitude).double().not_null())
                    .col(ColumnDef::new(Attractions::Longitude).double().not_null())
                    .col(ColumnDef::new(Attractions::Address).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Attractions::Importance)
                            .string_len(10)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Attractions::State)
                            .string_len(50)
                            .not_null()
                            .default("Activo"),
                    )
                    .col(ColumnDef::new(Attractions::Status).boolean().not_null().default(true))
                    .col(timestamp(Attractions::CreatedAt))
                    .col(timestamp(Attractions::UpdatedAt))
                    .col(deleted_at(Attractions::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attractions_province")
                            .from(Attractions::Table, Attractions::ProvinceId)
                            .to(Provinces::Table, Provinces::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attractions_category")
                            .from(Attractions::Table, Attractions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attractions_source")
                            .from(Attractions::Table, Attractions::SourceId)
                            .to(Sources::Table, Sources::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attractions_province_id")
                    .table(Attractions::Table)
                    .col(Attractions::ProvinceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attractions_category_id")
                    .table(Attractions::Table)
                    .col(Attractions::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(deleted_at_index(
                "idx_attractions_deleted_at",
                Attractions::Table,
                Attractions::DeletedAt,
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attractions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attractions {
    Table,
    Id,
    Name,
    Description,
    ProvinceId,
    CategoryId,
    SourceId,
    Latitude,
    Longitude,
    Address,
    Importance,
    State,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Provinces {
    Table,
    Id,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}

#[derive(Iden)]
enum Sources {
    Table,
    Id,
}
