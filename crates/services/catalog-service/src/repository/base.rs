//! Soft delete mechanics shared by every catalog repository.
//!
//! Each entity declares its id, `deleted_at` and `updated_at` columns (and
//! `status` if it has one) through [`SoftDelete`]; the generic functions
//! below then provide trashed scoping, soft delete, restore and permanent
//! delete for any connection or transaction.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Select};

use common::{AppError, AppResult};
use domain::{ListFilter, Trashed};

use super::entities::{attraction, category, contact, image, province, source, tag};

/// Entity with an integer id and a nullable `deleted_at` column.
pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;

    /// The `status` flag, for entities that have one
    fn status_column() -> Option<Self::Column> {
        None
    }
}

/// Restrict a select to live, trashed or all rows.
pub fn scoped<E: SoftDelete>(select: Select<E>, trashed: Trashed) -> Select<E> {
    match trashed {
        Trashed::Exclude => select.filter(E::deleted_at_column().is_null()),
        Trashed::Include => select,
        Trashed::Only => select.filter(E::deleted_at_column().is_not_null()),
    }
}

/// Apply a [`ListFilter`] (trashed scope plus optional status predicate).
pub fn filtered<E: SoftDelete>(select: Select<E>, filter: &ListFilter) -> Select<E> {
    let select = scoped(select, filter.trashed);
    match (filter.status, E::status_column()) {
        (Some(status), Some(column)) => select.filter(column.eq(status)),
        _ => select,
    }
}

/// Select a single row by id within a trashed scope.
pub fn by_id<E: SoftDelete>(id: i32, trashed: Trashed) -> Select<E> {
    scoped(E::find().filter(E::id_column().eq(id)), trashed)
}

/// Mark a live row deleted. `NotFound` if absent or already deleted.
pub async fn soft_delete<E, C>(db: &C, id: i32) -> AppResult<()>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Some(now)))
        .col_expr(E::updated_at_column(), Expr::value(now))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Clear `deleted_at` on a soft-deleted row. `NotFound` if none is trashed.
pub async fn restore<E, C>(db: &C, id: i32) -> AppResult<()>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(None::<DateTime<Utc>>))
        .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_not_null())
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Remove the row whether or not it is soft-deleted.
pub async fn permanently_delete<E, C>(db: &C, id: i32) -> AppResult<()>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(id))
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

macro_rules! soft_delete_entity {
    ($module:ident) => {
        impl SoftDelete for $module::Entity {
            fn id_column() -> Self::Column {
                $module::Column::Id
            }
            fn deleted_at_column() -> Self::Column {
                $module::Column::DeletedAt
            }
            fn updated_at_column() -> Self::Column {
                $module::Column::UpdatedAt
            }
        }
    };
    ($module:ident, with_status) => {
        impl SoftDelete for $module::Entity {
            fn id_column() -> Self::Column {
                $module::Column::Id
            }
            fn deleted_at_column() -> Self::Column {
                $module::Column::DeletedAt
            }
            fn updated_at_column() -> Self::Column {
                $module::Column::UpdatedAt
            }
            fn status_column() -> Option<Self::Column> {
                Some($module::Column::Status)
            }
        }
    };
}

soft_delete_entity!(province, with_status);
soft_delete_entity!(category, with_status);
soft_delete_entity!(source);
soft_delete_entity!(attraction, with_status);
soft_delete_entity!(contact, with_status);
soft_delete_entity!(image, with_status);
soft_delete_entity!(tag);
