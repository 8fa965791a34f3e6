//! Province entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::attraction::Attraction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Province {
    pub id: i32,
    pub name: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Present only when eager-loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attractions: Option<Vec<Attraction>>,
}

/// Relations that can be eager-loaded with a province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvinceRelation {
    Attractions,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProvince {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProvince {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub status: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_province_name_length() {
        let ok = CreateProvince {
            name: "Pichincha".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateProvince {
            name: "x".repeat(101),
        };
        assert!(too_long.validate().is_err());

        let empty = CreateProvince {
            name: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
