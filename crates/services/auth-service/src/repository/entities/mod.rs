//! SeaORM entity definitions for users and issued tokens.

pub mod auth_token;
pub mod user;
