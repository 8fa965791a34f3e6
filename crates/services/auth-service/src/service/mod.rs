//! Service layer - authentication business logic.

mod auth_service;

pub use auth_service::{
    AuthService, Authenticator, Claims, LoginResponse, RegisterResponse, TokenResponse,
};
