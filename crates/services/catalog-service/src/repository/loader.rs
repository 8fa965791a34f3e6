//! Batched eager loading.
//!
//! Every relation is fetched with a single `IN (...)` query over the ids of
//! the parent rows, then stitched onto the parents in memory. Soft-deleted
//! related rows are never loaded.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use common::AppResult;
use domain::{Attraction, AttractionRelation, Category, Contact, Image, Province, Source, Tag};

use super::entities::{attraction, attraction_tag, category, contact, image, province, source, tag};

fn distinct(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Attach the requested relations to a batch of attractions.
pub async fn load_attraction_relations<C: ConnectionTrait>(
    db: &C,
    attractions: &mut [Attraction],
    relations: &[AttractionRelation],
) -> AppResult<()> {
    if attractions.is_empty() || relations.is_empty() {
        return Ok(());
    }

    let ids = distinct(attractions.iter().map(|a| a.id));

    for relation in distinct_relations(relations) {
        match relation {
            AttractionRelation::Province => {
                let wanted = distinct(attractions.iter().map(|a| a.province_id));
                let by_id: HashMap<i32, Province> = province::Entity::find()
                    .filter(province::Column::Id.is_in(wanted))
                    .filter(province::Column::DeletedAt.is_null())
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|m| (m.id, Province::from(m)))
                    .collect();
                for a in attractions.iter_mut() {
                    a.province = by_id.get(&a.province_id).cloned();
                }
            }
            AttractionRelation::Category => {
                let wanted = distinct(attractions.iter().map(|a| a.category_id));
                let by_id: HashMap<i32, Category> = category::Entity::find()
                    .filter(category::Column::Id.is_in(wanted))
                    .filter(category::Column::DeletedAt.is_null())
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|m| (m.id, Category::from(m)))
                    .collect();
                for a in attractions.iter_mut() {
                    a.category = by_id.get(&a.category_id).cloned();
                }
            }
            AttractionRelation::Source => {
                let wanted = distinct(attractions.iter().map(|a| a.source_id));
                let by_id: HashMap<i32, Source> = source::Entity::find()
                    .filter(source::Column::Id.is_in(wanted))
                    .filter(source::Column::DeletedAt.is_null())
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|m| (m.id, Source::from(m)))
                    .collect();
                for a in attractions.iter_mut() {
                    a.source = by_id.get(&a.source_id).cloned();
                }
            }
            AttractionRelation::Contact => {
                let mut by_attraction: HashMap<i32, Contact> = HashMap::new();
                let models = contact::Entity::find()
                    .filter(contact::Column::AttractionId.is_in(ids.clone()))
                    .filter(contact::Column::DeletedAt.is_null())
                    .order_by_asc(contact::Column::Id)
                    .all(db)
                    .await?;
                for m in models {
                    by_attraction
                        .entry(m.attraction_id)
                        .or_insert_with(|| Contact::from(m));
                }
                for a in attractions.iter_mut() {
                    a.contact = by_attraction.get(&a.id).cloned();
                }
            }
            AttractionRelation::Images => {
                let mut by_attraction: HashMap<i32, Vec<Image>> = HashMap::new();
                let models = image::Entity::find()
                    .filter(image::Column::AttractionId.is_in(ids.clone()))
                    .filter(image::Column::DeletedAt.is_null())
                    .order_by_asc(image::Column::Id)
                    .all(db)
                    .await?;
                for m in models {
                    by_attraction
                        .entry(m.attraction_id)
                        .or_default()
                        .push(Image::from(m));
                }
                for a in attractions.iter_mut() {
                    a.images = Some(by_attraction.remove(&a.id).unwrap_or_default());
                }
            }
            AttractionRelation::Tags => {
                let mut by_attraction: HashMap<i32, Vec<Tag>> = HashMap::new();
                let rows = attraction_tag::Entity::find()
                    .filter(attraction_tag::Column::AttractionId.is_in(ids.clone()))
                    .find_also_related(tag::Entity)
                    .filter(tag::Column::DeletedAt.is_null())
                    .order_by_asc(tag::Column::Id)
                    .all(db)
                    .await?;
                for (link, tag) in rows {
                    if let Some(tag) = tag {
                        by_attraction
                            .entry(link.attraction_id)
                            .or_default()
                            .push(Tag::from(tag));
                    }
                }
                for a in attractions.iter_mut() {
                    a.tags = Some(by_attraction.remove(&a.id).unwrap_or_default());
                }
            }
        }
    }

    Ok(())
}

fn distinct_relations(relations: &[AttractionRelation]) -> Vec<AttractionRelation> {
    let mut out: Vec<AttractionRelation> = Vec::with_capacity(relations.len());
    for r in relations {
        if !out.contains(r) {
            out.push(*r);
        }
    }
    out
}

/// Live attractions whose `column` (a foreign key) is one of `parent_ids`,
/// grouped by that key.
pub async fn attractions_grouped_by<C: ConnectionTrait>(
    db: &C,
    column: attraction::Column,
    parent_ids: &[i32],
) -> AppResult<HashMap<i32, Vec<Attraction>>> {
    let mut grouped: HashMap<i32, Vec<Attraction>> = HashMap::new();
    if parent_ids.is_empty() {
        return Ok(grouped);
    }

    let models = attraction::Entity::find()
        .filter(column.is_in(distinct(parent_ids.iter().copied())))
        .filter(attraction::Column::DeletedAt.is_null())
        .order_by_asc(attraction::Column::Id)
        .all(db)
        .await?;

    for m in models {
        let key = match column {
            attraction::Column::ProvinceId => m.province_id,
            attraction::Column::CategoryId => m.category_id,
            attraction::Column::SourceId => m.source_id,
            _ => m.id,
        };
        grouped.entry(key).or_default().push(Attraction::from(m));
    }

    Ok(grouped)
}

/// Live attractions associated with each of `tag_ids`.
pub async fn attractions_by_tag<C: ConnectionTrait>(
    db: &C,
    tag_ids: &[i32],
) -> AppResult<HashMap<i32, Vec<Attraction>>> {
    let mut grouped: HashMap<i32, Vec<Attraction>> = HashMap::new();
    if tag_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = attraction_tag::Entity::find()
        .filter(attraction_tag::Column::TagId.is_in(distinct(tag_ids.iter().copied())))
        .find_also_related(attraction::Entity)
        .filter(attraction::Column::DeletedAt.is_null())
        .order_by_asc(attraction::Column::Id)
        .all(db)
        .await?;

    for (link, attraction) in rows {
        if let Some(attraction) = attraction {
            grouped
                .entry(link.tag_id)
                .or_default()
                .push(Attraction::from(attraction));
        }
    }

    Ok(grouped)
}

/// Live attractions keyed by id, for child entities loading their parent.
pub async fn attractions_by_id<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> AppResult<HashMap<i32, Attraction>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = attraction::Entity::find()
        .filter(attraction::Column::Id.is_in(distinct(ids.iter().copied())))
        .filter(attraction::Column::DeletedAt.is_null())
        .all(db)
        .await?;

    Ok(models
        .into_iter()
        .map(|m| (m.id, Attraction::from(m)))
        .collect())
}
