//! Errors raised while checking catalog and account input.
//!
//! Lookups and uniqueness are decided by the services against storage, so
//! they surface as `AppError` directly and have no variant here.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Input failed a field rule or could not be parsed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password too short or otherwise unusable
    #[error("Password error: {0}")]
    Password(String),

    /// Hashing backend failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        assert_eq!(
            DomainError::validation("importance").to_string(),
            "Validation error: importance"
        );
        assert_eq!(
            DomainError::password("too short").to_string(),
            "Password error: too short"
        );
    }
}
