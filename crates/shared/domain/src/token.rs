//! Token kinds issued by the authentication service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const KIND_ACCESS: &str = "access";
const KIND_REFRESH: &str = "refresh";

/// Access tokens authorize requests; refresh tokens only mint new pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => KIND_ACCESS,
            TokenKind::Refresh => KIND_REFRESH,
        }
    }
}

impl std::str::FromStr for TokenKind {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KIND_ACCESS => Ok(TokenKind::Access),
            KIND_REFRESH => Ok(TokenKind::Refresh),
            other => Err(crate::DomainError::validation(format!(
                "Unknown token kind '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of an issued token. Its id is the JWT `jti`; a token is only
/// honoured while its record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_kind_round_trips_through_str() {
        assert_eq!("access".parse::<TokenKind>().unwrap(), TokenKind::Access);
        assert_eq!(TokenKind::Refresh.to_string(), "refresh");
        assert!("bearer".parse::<TokenKind>().is_err());
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let now = Utc::now();
        let token = AuthToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: TokenKind::Access,
            expires_at: now,
            created_at: now - Duration::hours(1),
        };
        assert!(token.is_expired(now));
        assert!(!token.is_expired(now - Duration::seconds(1)));
    }
}
