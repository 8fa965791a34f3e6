//! Repository layer for data access.

pub(crate) mod base;
pub mod entities;
pub(crate) mod image_repository;
pub(crate) mod loader;

mod attraction_repository;
mod category_repository;
mod contact_repository;
mod province_repository;
mod source_repository;
mod tag_repository;

pub use attraction_repository::{AttractionRepository, AttractionStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use contact_repository::{ContactRepository, ContactStore};
pub use image_repository::{ImageRepository, ImageStore};
pub use province_repository::{ProvinceRepository, ProvinceStore};
pub use source_repository::{SourceRepository, SourceStore};
pub use tag_repository::{TagRepository, TagStore};

#[cfg(any(test, feature = "test-utils"))]
pub use attraction_repository::MockAttractionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use contact_repository::MockContactRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use image_repository::MockImageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use province_repository::MockProvinceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use source_repository::MockSourceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tag_repository::MockTagRepository;
