//! Migration: contacts, images and the attraction <-> tag association.
//!
//! All three cascade when their attraction row is removed.

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
                    .table(AttractionContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttractionContacts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AttractionContacts::AttractionId).integer().not_null())
                    .col(ColumnDef::new(AttractionContacts::Phone).string_len(50).null())
                    .col(ColumnDef::new(AttractionContacts::Email).string_len(150).null())
                    .col(ColumnDef::new(AttractionContacts::Website).string_len(200).null())
                    .col(
                        ColumnDef::new(AttractionContacts::Status)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(AttractionContacts::CreatedAt))
                    .col(timestamp(AttractionContacts::UpdatedAt))
                    .col(deleted_at(AttractionContacts::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attraction_contacts_attraction")
                            .from(AttractionContacts::Table, AttractionContacts::AttractionId)
                            .to(Attractions::Table, Attractions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttractionImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttractionImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AttractionImages::AttractionId).integer().not_null())
                    .col(ColumnDef::new(AttractionImages::Url).string().not_null())
                    .col(ColumnDef::new(AttractionImages::Description).text().null())
                    .col(
                        ColumnDef::new(AttractionImages::IsPrincipal)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AttractionImages::Status)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(AttractionImages::CreatedAt))
                    .col(timestamp(AttractionImages::UpdatedAt))
                    .col(deleted_at(AttractionImages::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attraction_images_attraction")
                            .from(AttractionImages::Table, AttractionImages::AttractionId)
                            .to(Attractions::Table, Attractions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttractionTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttractionTags::AttractionId).integer().not_null())
                    .col(ColumnDef::new(AttractionTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(AttractionTags::AttractionId)
                            .col(AttractionTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attraction_tags_attraction")
                            .from(AttractionTags::Table, AttractionTags::AttractionId)
                            .to(Attractions::Table, Attractions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attraction_tags_tag")
                            .from(AttractionTags::Table, AttractionTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attraction_contacts_attraction_id")
                    .table(AttractionContacts::Table)
                    .col(AttractionContacts::AttractionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attraction_images_attraction_id")
                    .table(AttractionImages::Table)
                    .col(AttractionImages::AttractionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(deleted_at_index(
                "idx_attraction_contacts_deleted_at",
                AttractionContacts::Table,
                AttractionContacts::DeletedAt,
            ))
            .await?;

        manager
            .create_index(deleted_at_index(
                "idx_attraction_images_deleted_at",
                AttractionImages::Table,
                AttractionImages::DeletedAt,
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttractionTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttractionImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttractionContacts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AttractionContacts {
    Table,
    Id,
    AttractionId,
    Phone,
    Email,
    Website,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum AttractionImages {
    Table,
    Id,
    AttractionId,
    Url,
    Description,
    IsPrincipal,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum AttractionTags {
    Table,
    AttractionId,
    TagId,
}

#[derive(Iden)]
enum Attractions {
    Table,
    Id,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
}
