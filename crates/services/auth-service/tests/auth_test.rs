//! Token lifecycle against a real (SQLite) database.

mod support;

use sea_orm::{EntityTrait, PaginatorTrait};

use auth_service_lib::repository::entities::auth_token;
use auth_service_lib::service::AuthService;
use common::{AppError, JwtConfig};
use domain::TokenKind;

use support::{ana, jwt, setup, setup_with, Auth, PASSWORD};

async fn stored_tokens(auth: &Auth) -> u64 {
    auth_token::Entity::find().count(&auth.db).await.unwrap()
}

#[tokio::test]
async fn test_register_then_login_issues_pair() {
    let auth = setup().await;
    let user = auth.service.register(ana()).await.unwrap().user;

    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    assert_eq!(login.user.id, user.id);
    assert_eq!(login.tokens.token_type, "Bearer");
    assert_eq!(login.tokens.expires_in, 3600);
    assert_eq!(login.tokens.refresh_expires_in, 30 * 24 * 3600);
    assert_eq!(stored_tokens(&auth).await, 2);

    let claims = auth
        .service
        .verify(&login.tokens.access_token, TokenKind::Access)
        .await
        .unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.kind, TokenKind::Access);
    assert!(claims.exp - claims.iat <= 3600);

    auth.service
        .verify(&login.tokens.refresh_token, TokenKind::Refresh)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_registration_signs_the_user_in() {
    let auth = setup().await;
    let registered = auth.service.register(ana()).await.unwrap();

    assert_eq!(registered.token_type, "Bearer");
    assert_eq!(registered.expires_in, 3600);
    assert_eq!(stored_tokens(&auth).await, 1);

    let current = auth
        .service
        .current_user(&registered.access_token)
        .await
        .unwrap();
    assert_eq!(current.id, registered.user.id);
    assert_eq!(current.email, "ana@example.com");

    // Logging in ends the registration session
    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();
    assert!(matches!(
        auth.service.current_user(&registered.access_token).await,
        Err(AppError::Unauthorized)
    ));
    assert_eq!(
        auth.service
            .current_user(&login.tokens.access_token)
            .await
            .unwrap()
            .id,
        registered.user.id
    );
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();

    let result = auth.service.register(ana()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_bad_credentials_rejected() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();

    let wrong = auth.service.login("ana@example.com", "not the password").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let unknown = auth.service.login("luis@example.com", PASSWORD).await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

    // Only the token handed out at registration
    assert_eq!(stored_tokens(&auth).await, 1);
}

#[tokio::test]
async fn test_login_revokes_earlier_tokens() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();

    let first = auth.service.login("ana@example.com", PASSWORD).await.unwrap();
    let second = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    assert!(matches!(
        auth.service
            .verify(&first.tokens.access_token, TokenKind::Access)
            .await,
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(
        auth.service.refresh(&first.tokens.refresh_token).await,
        Err(AppError::Unauthorized)
    ));
    assert!(auth
        .service
        .verify(&second.tokens.access_token, TokenKind::Access)
        .await
        .is_ok());
    assert_eq!(stored_tokens(&auth).await, 2);
}

#[tokio::test]
async fn test_refresh_token_is_single_use() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();
    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    let refreshed = auth.service.refresh(&login.tokens.refresh_token).await.unwrap();
    assert_ne!(refreshed.refresh_token, login.tokens.refresh_token);
    auth.service
        .verify(&refreshed.access_token, TokenKind::Access)
        .await
        .unwrap();

    // Second use of the same refresh token
    let replay = auth.service.refresh(&login.tokens.refresh_token).await;
    assert!(matches!(replay, Err(AppError::Unauthorized)));

    // The rotated token still works once
    auth.service.refresh(&refreshed.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_access_token_cannot_refresh() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();
    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    let result = auth.service.refresh(&login.tokens.access_token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));

    // The refresh token was not consumed by the failed attempt
    auth.service.refresh(&login.tokens.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_everything() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();
    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    auth.service.logout(&login.tokens.access_token).await.unwrap();

    assert_eq!(stored_tokens(&auth).await, 0);
    assert!(matches!(
        auth.service
            .verify(&login.tokens.access_token, TokenKind::Access)
            .await,
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(
        auth.service.refresh(&login.tokens.refresh_token).await,
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(
        auth.service.logout(&login.tokens.access_token).await,
        Err(AppError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_expired_access_token_rejected() {
    // Past the default 60s leeway of the JWT validation
    let auth = setup_with(JwtConfig {
        access_ttl_minutes: -5,
        ..jwt()
    })
    .await;
    auth.service.register(ana()).await.unwrap();
    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    let result = auth
        .service
        .verify(&login.tokens.access_token, TokenKind::Access)
        .await;
    assert!(matches!(result, Err(AppError::Unauthorized)));

    // Only the expired access record goes
    assert_eq!(auth.service.purge_expired_tokens().await.unwrap(), 1);
    assert_eq!(stored_tokens(&auth).await, 1);
}

#[tokio::test]
async fn test_concurrent_logins_leave_one_live_pair() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = auth.service.clone();
        handles.push(tokio::spawn(async move {
            service.login("ana@example.com", PASSWORD).await
        }));
    }

    let mut live = 0;
    for handle in handles {
        let login = handle.await.unwrap().unwrap();
        if auth
            .service
            .verify(&login.tokens.refresh_token, TokenKind::Refresh)
            .await
            .is_ok()
        {
            live += 1;
        }
    }

    assert_eq!(live, 1);
    assert_eq!(stored_tokens(&auth).await, 2);
}

#[tokio::test]
async fn test_logged_out_token_has_no_current_user() {
    let auth = setup().await;
    auth.service.register(ana()).await.unwrap();
    let login = auth.service.login("ana@example.com", PASSWORD).await.unwrap();

    auth.service.logout(&login.tokens.access_token).await.unwrap();

    assert!(matches!(
        auth.service.current_user(&login.tokens.access_token).await,
        Err(AppError::Unauthorized)
    ));
}
