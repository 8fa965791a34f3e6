//! Authentication service - registration, login, refresh and logout.
//!
//! Tokens are HS256 JWTs whose `jti` is the id of a row in `auth_tokens`.
//! A token verifies only while that row exists, which gives:
//! - login revokes every earlier token of the user before issuing a pair;
//! - a refresh token is consumed by its first use;
//! - logout revokes every token of the user.
//!
//! Login and refresh lock the user row before touching tokens, so
//! concurrent rotations for one user cannot leave two live pairs.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::infra::{TxTokenRepository, UnitOfWork};
use crate::repository::UserRepository;
use common::{AppError, AppResult, JwtConfig};
use domain::{
    validate_input, AuthToken, CreateUser, Password, TokenKind, User, UserResponse,
    TOKEN_TYPE_BEARER,
};

/// Verified against when the email is unknown, so both paths hash once.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// Token record id
    pub jti: Uuid,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

/// New account plus an access token, so the client starts signed in
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue an access token. Emails stay reserved
    /// after soft delete.
    async fn register(&self, input: CreateUser) -> AppResult<RegisterResponse>;

    /// Check credentials, revoke earlier tokens and issue a new pair
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse>;

    /// Exchange a refresh token (once) for a new pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// Revoke every token of the access token's user
    async fn logout(&self, access_token: &str) -> AppResult<()>;

    /// Signature, expiry, kind and stored record must all check out
    async fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims>;

    /// The live user an access token belongs to
    async fn current_user(&self, access_token: &str) -> AppResult<User>;

    /// Remove expired token records
    async fn purge_expired_tokens(&self) -> AppResult<u64>;
}

/// Signs tokens and records them. Owned by transaction closures.
#[derive(Clone)]
struct TokenIssuer {
    encoding: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    fn new(config: &JwtConfig) -> AppResult<Self> {
        let access_ttl = Duration::try_minutes(config.access_ttl_minutes)
            .ok_or_else(|| AppError::internal("Access token TTL out of range"))?;
        let refresh_ttl = Duration::try_days(config.refresh_ttl_days)
            .ok_or_else(|| AppError::internal("Refresh token TTL out of range"))?;

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    fn expiry(&self, now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
        now.checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))
    }

    /// Sign the JWT for a stored record
    fn sign(&self, record: &AuthToken, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: record.user_id,
            jti: record.id,
            kind: record.kind,
            exp: record.expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    async fn issue_pair(
        &self,
        tokens: &TxTokenRepository<'_>,
        user_id: Uuid,
    ) -> AppResult<TokenResponse> {
        let access_token = self
            .issue(tokens, user_id, TokenKind::Access, self.access_ttl)
            .await?;
        let refresh_token = self
            .issue(tokens, user_id, TokenKind::Refresh, self.refresh_ttl)
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_ttl.num_seconds(),
            refresh_expires_in: self.refresh_ttl.num_seconds(),
        })
    }

    async fn issue(
        &self,
        tokens: &TxTokenRepository<'_>,
        user_id: Uuid,
        kind: TokenKind,
        ttl: Duration,
    ) -> AppResult<String> {
        let now = Utc::now();
        let record = tokens.issue(user_id, kind, self.expiry(now, ttl)?).await?;
        self.sign(&record, now)
    }
}

/// Concrete implementation of AuthService.
pub struct Authenticator<U: UnitOfWork> {
    users: Arc<dyn UserRepository>,
    uow: Arc<U>,
    issuer: TokenIssuer,
    decoding: DecodingKey,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(users: Arc<dyn UserRepository>, uow: Arc<U>, jwt: &JwtConfig) -> AppResult<Self> {
        Ok(Self {
            users,
            uow,
            issuer: TokenIssuer::new(jwt)?,
            decoding: DecodingKey::from_secret(jwt.secret_bytes()),
        })
    }

    fn decode_claims(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                tracing::warn!(error = %e, %kind, "Rejected token");
                AppError::Unauthorized
            })?;

        if data.claims.kind != kind {
            tracing::warn!(expected = %kind, found = %data.claims.kind, "Wrong token kind");
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims)
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> AuthService for Authenticator<U> {
    async fn register(&self, input: CreateUser) -> AppResult<RegisterResponse> {
        validate_input(&input)?;

        // Soft-deleted users keep their email
        if self
            .users
            .find_by_email_with_deleted(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .users
            .create(input.email, password_hash, input.name)
            .await?;

        let now = Utc::now();
        let issuer = &self.issuer;
        let record = self
            .uow
            .tokens()
            .issue(user.id, TokenKind::Access, issuer.expiry(now, issuer.access_ttl)?)
            .await?;
        let access_token = issuer.sign(&record, now)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(RegisterResponse {
            user: UserResponse::from(user),
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: issuer.access_ttl.num_seconds(),
        })
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self.users.find_by_email(email).await?;

        let hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(DUMMY_HASH);
        let password_valid = Password::from_hash(hash).verify(password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!("Login failed");
                return Err(AppError::InvalidCredentials);
            }
        };

        let issuer = self.issuer.clone();
        let user_id = user.id;
        let tokens = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if !ctx.lock_user(user_id).await? {
                        return Err(AppError::InvalidCredentials);
                    }
                    let tokens = ctx.tokens();
                    let revoked = tokens.revoke_all(user_id).await?;
                    tracing::debug!(%user_id, revoked, "Revoked previous tokens");
                    issuer.issue_pair(&tokens, user_id).await
                })
            })
            .await?;

        tracing::info!(%user_id, "User logged in");
        Ok(LoginResponse {
            user: UserResponse::from(user),
            tokens,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = self.verify(refresh_token, TokenKind::Refresh).await?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let issuer = self.issuer.clone();
        let user_id = user.id;
        let jti = claims.jti;
        let tokens = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if !ctx.lock_user(user_id).await? {
                        return Err(AppError::Unauthorized);
                    }
                    let tokens = ctx.tokens();
                    // Two concurrent refreshes: only one removes the row
                    if !tokens.revoke(jti).await? {
                        tracing::warn!(%user_id, "Refresh token already used");
                        return Err(AppError::Unauthorized);
                    }
                    issuer.issue_pair(&tokens, user_id).await
                })
            })
            .await?;

        tracing::info!(%user_id, "Tokens refreshed");
        Ok(tokens)
    }

    async fn logout(&self, access_token: &str) -> AppResult<()> {
        let claims = self.verify(access_token, TokenKind::Access).await?;
        let revoked = self.uow.tokens().revoke_all(claims.sub).await?;

        tracing::info!(user_id = %claims.sub, revoked, "User logged out");
        Ok(())
    }

    async fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let claims = self.decode_claims(token, kind)?;

        let record = self
            .uow
            .tokens()
            .find_by_id(claims.jti)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.sub, %kind, "Token revoked");
                AppError::Unauthorized
            })?;

        if record.user_id != claims.sub || record.kind != kind || record.is_expired(Utc::now()) {
            tracing::warn!(user_id = %claims.sub, %kind, "Token record mismatch");
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }

    async fn current_user(&self, access_token: &str) -> AppResult<User> {
        let claims = self.verify(access_token, TokenKind::Access).await?;

        self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            tracing::warn!(user_id = %claims.sub, "Token for a missing user");
            AppError::Unauthorized
        })
    }

    async fn purge_expired_tokens(&self) -> AppResult<u64> {
        let purged = self.uow.tokens().purge_expired(Utc::now()).await?;
        tracing::info!(purged, "Expired tokens purged");
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;

    use crate::infra::TransactionContext;
    use crate::repository::{MockTokenRepository, MockUserRepository, TokenRepository};

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    /// Test mock for UnitOfWork that wraps a MockTokenRepository
    struct MockUnitOfWork {
        tokens: Arc<MockTokenRepository>,
    }

    #[async_trait]
    impl UnitOfWork for MockUnitOfWork {
        fn tokens(&self) -> Arc<dyn TokenRepository> {
            self.tokens.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
                + Send,
            T: Send,
        {
            // Transaction not supported in test mock
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            ..JwtConfig::default()
        }
    }

    fn service_with(
        users: MockUserRepository,
        tokens: MockTokenRepository,
    ) -> Authenticator<MockUnitOfWork> {
        let uow = Arc::new(MockUnitOfWork {
            tokens: Arc::new(tokens),
        });
        Authenticator::new(Arc::new(users), uow, &jwt()).unwrap()
    }

    fn service(users: MockUserRepository) -> Authenticator<MockUnitOfWork> {
        service_with(users, MockTokenRepository::new())
    }

    fn signed(claims: &Claims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn claims(kind: TokenKind) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            jti: Uuid::new_v4(),
            kind,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        }
    }

    fn record(claims: &Claims) -> AuthToken {
        AuthToken {
            id: claims.jti,
            user_id: claims.sub,
            kind: claims.kind,
            expires_at: Utc::now() + Duration::hours(1),
            created_at: Utc::now(),
        }
    }

    fn user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Ana".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn input(password: &str) -> CreateUser {
        CreateUser {
            email: "ana@example.com".to_string(),
            password: password.to_string(),
            name: "Ana".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_issues_access_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_with_deleted()
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|email, hash, _| {
                email == "ana@example.com" && Password::from_hash(hash.as_str()).verify("correct horse")
            })
            .times(1)
            .returning(|email, password_hash, name| {
                Ok(User {
                    id: Uuid::new_v4(),
                    email,
                    password_hash,
                    name,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                    deleted_at: None,
                })
            });
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_issue()
            .withf(|_, kind, _| *kind == TokenKind::Access)
            .times(1)
            .returning(|user_id, kind, expires_at| {
                Ok(AuthToken {
                    id: Uuid::new_v4(),
                    user_id,
                    kind,
                    expires_at,
                    created_at: Utc::now(),
                })
            });

        let registered = service_with(users, tokens)
            .register(input("correct horse"))
            .await
            .unwrap();

        assert_eq!(registered.user.email, "ana@example.com");
        assert_eq!(registered.token_type, "Bearer");
        assert_eq!(registered.expires_in, 3600);

        let data = decode::<Claims>(
            &registered.access_token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(data.claims.sub, registered.user.id);
        assert_eq!(data.claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_overflowing_token_lifetime_rejected() {
        let uow = Arc::new(MockUnitOfWork {
            tokens: Arc::new(MockTokenRepository::new()),
        });
        let config = JwtConfig {
            access_ttl_minutes: i64::MAX,
            ..jwt()
        };

        let result = Authenticator::new(Arc::new(MockUserRepository::new()), uow, &config);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_with_deleted()
            .returning(|_| Ok(Some(user("whatever123"))));
        users.expect_create().never();

        let result = service(users).register(input("correct horse")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_short_password_fails_validation() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_with_deleted()
            .returning(|_| Ok(None));
        users.expect_create().never();

        let result = service(users).register(input("short")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_email_fails_validation() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email_with_deleted().never();

        let mut bad = input("correct horse");
        bad.email = "not-an-email".to_string();

        let result = service(users).register(bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = service(users).login("nobody@example.com", "whatever123").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let stored = user("correct horse");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let result = service(users).login("ana@example.com", "wrong horse").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_garbage_token_unauthorized() {
        let auth = service(MockUserRepository::new());
        let result = tokio_test::block_on(auth.verify("not.a.jwt", TokenKind::Access));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_token_kind_must_match() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_find_by_id().never();

        let token = signed(&claims(TokenKind::Access), SECRET.as_bytes());
        let result = service_with(MockUserRepository::new(), tokens)
            .verify(&token, TokenKind::Refresh)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_foreign_signature_unauthorized() {
        let token = signed(
            &claims(TokenKind::Access),
            b"some-other-secret-of-sufficient-length",
        );

        let result = service(MockUserRepository::new())
            .verify(&token, TokenKind::Access)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_revoked_token_unauthorized() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_find_by_id().returning(|_| Ok(None));

        let token = signed(&claims(TokenKind::Access), SECRET.as_bytes());
        let result = service_with(MockUserRepository::new(), tokens)
            .verify(&token, TokenKind::Access)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_record_of_other_user_unauthorized() {
        let issued = claims(TokenKind::Access);
        let mut stored = record(&issued);
        stored.user_id = Uuid::new_v4();
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let token = signed(&issued, SECRET.as_bytes());
        let result = service_with(MockUserRepository::new(), tokens)
            .verify(&token, TokenKind::Access)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_current_user_follows_access_token() {
        let issued = claims(TokenKind::Access);
        let stored = record(&issued);
        let mut account = user("correct horse");
        account.id = issued.sub;
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(mockall::predicate::eq(issued.sub))
            .returning(move |_| Ok(Some(account.clone())));

        let token = signed(&issued, SECRET.as_bytes());
        let current = service_with(users, tokens).current_user(&token).await.unwrap();
        assert_eq!(current.id, issued.sub);
    }

    #[tokio::test]
    async fn test_current_user_gone_is_unauthorized() {
        let issued = claims(TokenKind::Access);
        let stored = record(&issued);
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let token = signed(&issued, SECRET.as_bytes());
        let result = service_with(users, tokens).current_user(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_current_user_rejects_refresh_token() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let token = signed(&claims(TokenKind::Refresh), SECRET.as_bytes());
        let result = service(users).current_user(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_logout_revokes_all_tokens_of_user() {
        let issued = claims(TokenKind::Access);
        let stored = record(&issued);
        let user_id = issued.sub;
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_id()
            .with(mockall::predicate::eq(issued.jti))
            .returning(move |_| Ok(Some(stored.clone())));
        tokens
            .expect_revoke_all()
            .with(mockall::predicate::eq(user_id))
            .times(1)
            .returning(|_| Ok(2));

        let token = signed(&issued, SECRET.as_bytes());
        let result = service_with(MockUserRepository::new(), tokens)
            .logout(&token)
            .await;
        assert!(result.is_ok());
    }
}
