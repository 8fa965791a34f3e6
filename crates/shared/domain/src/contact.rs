//! Contact details of an attraction (one per attraction).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::attraction::Attraction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i32,
    pub attraction_id: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
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
pub enum ContactRelation {
    Attraction,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    pub attraction_id: i32,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    #[validate(url, length(max = 200))]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContact {
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    #[validate(url, length(max = 200))]
    pub website: Option<String>,
    pub status: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_rules() {
        let valid = CreateContact {
            attraction_id: 1,
            phone: Some("+593 2 000 0000".to_string()),
            email: Some("info@cotopaxi.ec".to_string()),
            website: Some("https://cotopaxi.ec".to_string()),
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateContact {
            email: Some("not-an-email".to_string()),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let bad_site = CreateContact {
            website: Some("cotopaxi".to_string()),
            ..valid
        };
        assert!(bad_site.validate().is_err());
    }
}
