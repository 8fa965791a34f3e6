//! Migration: partial unique indexes for the one-per-attraction rules.
//!
//! - at most one live principal image per attraction;
//! - at most one live contact per attraction.
//!
//! Soft-deleted rows are outside both indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Partial indexes; same syntax on PostgreSQL and SQLite
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_attraction_images_live_principal \
             ON attraction_images (attraction_id) \
             WHERE is_principal AND deleted_at IS NULL",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_attraction_contacts_live \
             ON attraction_contacts (attraction_id) \
             WHERE deleted_at IS NULL",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_attraction_contacts_live")
                    .table(AttractionContacts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_attraction_images_live_principal")
                    .table(AttractionImages::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum AttractionImages {
    Table,
}

#[derive(Iden)]
enum AttractionContacts {
    Table,
}
