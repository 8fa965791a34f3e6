//! Repository layer - data access for users and issued tokens.

pub mod entities;
pub(crate) mod token_repository;
mod user_repository;

pub use token_repository::{TokenRepository, TokenStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use token_repository::MockTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
