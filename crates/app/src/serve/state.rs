//! Shared handler state.

use std::sync::Arc;

use services::{AppServices, CatalogService, ProgressService};

pub(crate) struct AppState {
    pub(crate) progress: Arc<ProgressService>,
    pub(crate) catalog: Arc<CatalogService>,
}

impl AppState {
    pub(crate) fn new(services: &AppServices) -> Self {
        Self {
            progress: services.progress(),
            catalog: services.catalog(),
        }
    }
}
