//! Attraction images.
//!
//! At most one image per attraction is principal. The rule is enforced by
//! the image service, not by this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::attraction::Attraction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i32,
    pub attraction_id: i32,
    pub url: String,
    pub description: Option<String>,
    pub is_principal: bool,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attraction: Option<Box<Attraction>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRelation {
    Attraction,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateImage {
    pub attraction_id: i32,
    #[validate(url)]
    pub url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_principal: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateImage {
    #[validate(url)]
    pub url: Option<String>,
    pub description: Option<String>,
    pub is_principal: Option<bool>,
    pub status: Option<bool>,
}
