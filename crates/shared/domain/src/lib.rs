//! Domain layer - Catalog entities, input types and value objects.
//!
//! This crate contains plain data types with no persistence code.
//! Repositories and services in the service crates map to and from them.

pub mod attraction;
pub mod category;
pub mod constants;
pub mod contact;
pub mod error;
pub mod filter;
pub mod image;
pub mod password;
pub mod province;
pub mod source;
pub mod tag;
pub mod token;
pub mod user;
pub mod validation;

pub use attraction::{
    Attraction, AttractionRelation, CreateAttraction, ImportanceLevel, UpdateAttraction,
};
pub use category::{Category, CategoryRelation, CreateCategory, UpdateCategory};
pub use constants::*;
pub use contact::{Contact, ContactRelation, CreateContact, UpdateContact};
pub use error::{DomainError, DomainResult};
pub use filter::{ListFilter, Trashed};
pub use image::{CreateImage, Image, ImageRelation, UpdateImage};
pub use password::Password;
pub use province::{CreateProvince, Province, ProvinceRelation, UpdateProvince};
pub use source::{CreateSource, Source, SourceRelation, UpdateSource};
pub use tag::{CreateTag, Tag, TagRelation, UpdateTag};
pub use token::{AuthToken, TokenKind};
pub use user::{CreateUser, User, UserResponse};
pub use validation::validate_input;
