//! Migration: provinces, categories, sources and tags.

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
                    .table(Provinces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Provinces::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Provinces::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Provinces::Status).boolean().not_null().default(true))
                    .col(timestamp(Provinces::CreatedAt))
                    .col(timestamp(Provinces::UpdatedAt))
                    .col(deleted_at(Provinces::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Categories::Description).string_len(255).null())
                    .col(ColumnDef::new(Categories::Icon).string_len(50).null())
                    .col(ColumnDef::new(Categories::Color).string_len(7).null())
                    .col(ColumnDef::new(Categories::Status).boolean().not_null().default(true))
                    .col(timestamp(Categories::CreatedAt))
                    .col(timestamp(Categories::UpdatedAt))
                    .col(deleted_at(Categories::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sources::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sources::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Sources::Url).string().null())
                    .col(ColumnDef::new(Sources::ObtainedOn).date().not_null())
                    .col(timestamp(Sources::CreatedAt))
                    .col(timestamp(Sources::UpdatedAt))
                    .col(deleted_at(Sources::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tags::Name)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp(Tags::CreatedAt))
                    .col(timestamp(Tags::UpdatedAt))
                    .col(deleted_at(Tags::DeletedAt))
                    .to_owned(),
            )
            .await?;

        // Soft delete filtering
        manager
            .create_index(deleted_at_index("idx_provinces_deleted_at", Provinces::Table, Provinces::DeletedAt))
            .await?;
        manager
            .create_index(deleted_at_index("idx_categories_deleted_at", Categories::Table, Categories::DeletedAt))
            .await?;
        manager
            .create_index(deleted_at_index("idx_sources_deleted_at", Sources::Table, Sources::DeletedAt))
            .await?;
        manager
            .create_index(deleted_at_index("idx_tags_deleted_at", Tags::Table, Tags::DeletedAt))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Provinces::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Provinces {
    Table,
    Id,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    Icon,
    Color,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Sources {
    Table,
    Id,
    Name,
    Url,
    ObtainedOn,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
