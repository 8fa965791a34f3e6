//! Attraction entity: the aggregate root of the catalog.
//!
//! Contacts, images and tag associations belong to an attraction and
//! are removed with it when it is permanently deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::category::Category;
use crate::contact::Contact;
use crate::error::DomainError;
use crate::image::Image;
use crate::province::Province;
use crate::source::Source;
use crate::tag::Tag;

/// How significant an attraction is.
///
/// Stored in English; the Spanish values used by the original catalog
/// (`baja`, `media`, `alta`) are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceLevel {
    #[serde(alias = "baja")]
    Low,
    #[default]
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "alta")]
    High,
}

impl ImportanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportanceLevel::Low => "low",
            ImportanceLevel::Medium => "medium",
            ImportanceLevel::High => "high",
        }
    }
}

impl std::str::FromStr for ImportanceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "baja" => Ok(ImportanceLevel::Low),
            "medium" | "media" => Ok(ImportanceLevel::Medium),
            "high" | "alta" => Ok(ImportanceLevel::High),
            other => Err(DomainError::validation(format!(
                "Importance level must be low, medium or high (got '{}')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub province_id: i32,
    pub category_id: i32,
    pub source_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub importance: ImportanceLevel,
    /// Free-text operational state, e.g. "Activo"
    pub state: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    // Eager-loaded relations (None when not requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<Province>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Attraction {
    /// The principal image among the loaded images, if any.
    pub fn principal_image(&self) -> Option<&Image> {
        self.images
            .as_ref()
            .and_then(|images| images.iter().find(|i| i.is_principal))
    }
}

/// Relations that can be eager-loaded with an attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttractionRelation {
    Province,
    Category,
    Source,
    Contact,
    Images,
    Tags,
}

impl AttractionRelation {
    /// Every relation, as used by the detail view.
    pub const ALL: [AttractionRelation; 6] = [
        AttractionRelation::Province,
        AttractionRelation::Category,
        AttractionRelation::Source,
        AttractionRelation::Contact,
        AttractionRelation::Images,
        AttractionRelation::Tags,
    ];

    /// Relations loaded by the by-province, by-category and search listings.
    pub const LISTING: [AttractionRelation; 3] = [
        AttractionRelation::Province,
        AttractionRelation::Category,
        AttractionRelation::Images,
    ];
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttraction {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub province_id: i32,
    pub category_id: i32,
    pub source_id: i32,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub importance: ImportanceLevel,
    #[validate(length(min = 1, max = 50))]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAttraction {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub province_id: Option<i32>,
    pub category_id: Option<i32>,
    pub source_id: Option<i32>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    pub importance: Option<ImportanceLevel>,
    #[validate(length(min = 1, max = 50))]
    pub state: Option<String>,
    pub status: Option<bool>,
}
