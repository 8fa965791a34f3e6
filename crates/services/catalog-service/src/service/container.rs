//! Service container - wires every catalog repository and service.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AttractionManager, AttractionService, CategoryManager, CategoryService, ContactManager,
    ContactService, ImageManager, ImageService, ProvinceManager, ProvinceService, SourceManager,
    SourceService, TagManager, TagService,
};
use crate::infra::Persistence;
use crate::repository::{
    AttractionStore, CategoryStore, ContactStore, ProvinceStore, SourceStore, TagStore,
};

/// Access to every catalog service, for the API layer.
pub trait CatalogContainer: Send + Sync {
    fn attractions(&self) -> Arc<dyn AttractionService>;
    fn provinces(&self) -> Arc<dyn ProvinceService>;
    fn categories(&self) -> Arc<dyn CategoryService>;
    fn sources(&self) -> Arc<dyn SourceService>;
    fn contacts(&self) -> Arc<dyn ContactService>;
    fn images(&self) -> Arc<dyn ImageService>;
    fn tags(&self) -> Arc<dyn TagService>;
}

/// Concrete implementation of CatalogContainer
#[derive(Clone)]
pub struct CatalogServices {
    attraction_service: Arc<dyn AttractionService>,
    province_service: Arc<dyn ProvinceService>,
    category_service: Arc<dyn CategoryService>,
    source_service: Arc<dyn SourceService>,
    contact_service: Arc<dyn ContactService>,
    image_service: Arc<dyn ImageService>,
    tag_service: Arc<dyn TagService>,
}

impl CatalogServices {
    /// Build every repository and service over one connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        let attractions = Arc::new(AttractionStore::new(db.clone()));
        let provinces = Arc::new(ProvinceStore::new(db.clone()));
        let categories = Arc::new(CategoryStore::new(db.clone()));
        let sources = Arc::new(SourceStore::new(db.clone()));
        let contacts = Arc::new(ContactStore::new(db.clone()));
        let tags = Arc::new(TagStore::new(db.clone()));
        let uow = Arc::new(Persistence::new(db));

        Self {
            attraction_service: Arc::new(AttractionManager::new(
                attractions.clone(),
                provinces.clone(),
                categories.clone(),
                sources.clone(),
            )),
            province_service: Arc::new(ProvinceManager::new(provinces)),
            category_service: Arc::new(CategoryManager::new(categories)),
            source_service: Arc::new(SourceManager::new(sources)),
            contact_service: Arc::new(ContactManager::new(contacts, attractions.clone())),
            image_service: Arc::new(ImageManager::new(uow)),
            tag_service: Arc::new(TagManager::new(tags, attractions)),
        }
    }
}

impl CatalogContainer for CatalogServices {
    fn attractions(&self) -> Arc<dyn AttractionService> {
        self.attraction_service.clone()
    }

    fn provinces(&self) -> Arc<dyn ProvinceService> {
        self.province_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn sources(&self) -> Arc<dyn SourceService> {
        self.source_service.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactService> {
        self.contact_service.clone()
    }

    fn images(&self) -> Arc<dyn ImageService> {
        self.image_service.clone()
    }

    fn tags(&self) -> Arc<dyn TagService> {
        self.tag_service.clone()
    }
}
