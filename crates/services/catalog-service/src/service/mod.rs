//! Catalog service layer.
//!
//! Services validate input, check references and uniqueness, fill
//! defaults, and delegate to repositories. The image service additionally
//! keeps the principal image rule inside a unit of work.

mod attraction_service;
mod category_service;
pub mod container;
mod contact_service;
mod image_service;
mod province_service;
mod source_service;
mod tag_service;

pub use container::{CatalogContainer, CatalogServices};

pub use attraction_service::{AttractionManager, AttractionService};
pub use category_service::{CategoryManager, CategoryService};
pub use contact_service::{ContactManager, ContactService};
pub use image_service::{ImageManager, ImageService};
pub use province_service::{ProvinceManager, ProvinceService};
pub use source_service::{SourceManager, SourceService};
pub use tag_service::{TagManager, TagService};
