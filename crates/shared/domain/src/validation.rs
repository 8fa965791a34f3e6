//! Declarative input validation helpers.
//!
//! Input structs derive `validator::Validate`; services call
//! [`validate_input`] explicitly before every write.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::error::{DomainError, DomainResult};

/// `#RRGGBB` hex color, as stored on categories.
pub static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Run the declarative rules of an input struct.
pub fn validate_input<T: Validate>(input: &T) -> DomainResult<()> {
    input.validate().map_err(DomainError::from)
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
                format!("{}: {}", field, codes.join(", "))
            })
            .collect();
        fields.sort();

        DomainError::Validation(format!("Invalid input ({})", fields.join("; ")))
    }
}
