//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod users;
pub mod validation;

use crate::{config::CatalogueConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, catalogue: CatalogueConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), catalogue.admin_username.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), catalogue.books_per_page),
            circulation: circulation::CirculationService::new(repository.clone()),
            repository,
        }
    }

    /// Whether the database answers
    pub async fn ready(&self) -> bool {
        self.repository.ping().await.is_ok()
    }
}
