//! Catalog database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_lookup_tables;
mod m20240101_000002_create_attractions_table;
mod m20240101_000003_create_attraction_children;
mod m20240102_000001_add_single_live_constraints;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_lookup_tables::Migration),
            Box::new(m20240101_000002_create_attractions_table::Migration),
            Box::new(m20240101_000003_create_attraction_children::Migration),
            Box::new(m20240102_000001_add_single_live_constraints::Migration),
        ]
    }
}

/// Index backing the `deleted_at IS NULL` filter.
fn deleted_at_index<T, C>(name: &str, table: T, column: C) -> IndexCreateStatement
where
    T: Iden + 'static,
    C: Iden + 'static,
{
    Index::create()
        .name(name)
        .table(table)
        .col(column)
        .to_owned()
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn deleted_at<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .null()
        .to_owned()
}
