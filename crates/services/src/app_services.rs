use std::sync::Arc;

use storage::catalog::ExperimentCatalog;
use storage::repository::Storage;

use crate::catalog_service::CatalogService;
use crate::client::LocalProgressClient;
use crate::progress_service::ProgressService;
use crate::Clock;

/// Assembles the services the lab server and in-process players share.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    catalog: Arc<CatalogService>,
}

impl AppServices {
    /// Build services over the given storage backend.
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage, catalog: ExperimentCatalog) -> Self {
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let catalog = Arc::new(CatalogService::new(Arc::new(catalog)));
        Self { progress, catalog }
    }

    /// Build services backed by a fresh in-memory progress table.
    #[must_use]
    pub fn in_memory(clock: Clock, catalog: ExperimentCatalog) -> Self {
        Self::new(clock, &Storage::in_memory(), catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    /// A client that talks to this process's progress service.
    #[must_use]
    pub fn local_client(&self) -> LocalProgressClient {
        LocalProgressClient::new((*self.progress).clone())
    }
}
