//! Common utilities shared across the catalog and auth services.
//!
//! This crate provides:
//! - Unified error handling with HTTP status mapping for the API layer
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
