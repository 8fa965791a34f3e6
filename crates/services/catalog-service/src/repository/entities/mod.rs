//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod attraction;
pub mod attraction_tag;
pub mod category;
pub mod contact;
pub mod image;
pub mod province;
pub mod source;
pub mod tag;
