use std::sync::Arc;

use lab_core::model::{Experiment, ExperimentCategory, ExperimentId, NavigationPolicy};
use serde::{Deserialize, Serialize};
use storage::catalog::ExperimentCatalog;

use crate::error::CatalogServiceError;

/// Catalog listing entry; the full step list is only sent per experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentSummary {
    pub id: ExperimentId,
    pub title: String,
    pub category: ExperimentCategory,
    pub duration: String,
    pub step_count: usize,
    pub navigation: NavigationPolicy,
}

impl ExperimentSummary {
    #[must_use]
    pub fn from_experiment(experiment: &Experiment) -> Self {
        Self {
            id: experiment.id,
            title: experiment.title.clone(),
            category: experiment.category.clone(),
            duration: experiment.duration.clone(),
            step_count: experiment.total_steps(),
            navigation: experiment.navigation,
        }
    }
}

/// Serves the static experiment catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<ExperimentCatalog>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<ExperimentCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn list_experiments(&self) -> Vec<ExperimentSummary> {
        self.catalog
            .list()
            .iter()
            .map(ExperimentSummary::from_experiment)
            .collect()
    }

    /// # Errors
    ///
    /// Returns `CatalogServiceError::NotFound` for unknown ids.
    pub fn get_experiment(&self, id: ExperimentId) -> Result<Experiment, CatalogServiceError> {
        self.catalog
            .get(id)
            .cloned()
            .ok_or(CatalogServiceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_follow_catalog_order() {
        let service = CatalogService::new(Arc::new(ExperimentCatalog::bundled().unwrap()));
        let summaries = service.list_experiments();

        let ids: Vec<u64> = summaries.iter().map(|s| s.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(summaries[0].step_count, 6);
        assert_eq!(summaries[0].navigation, NavigationPolicy::Linear);
    }

    #[test]
    fn unknown_experiment_is_not_found() {
        let service = CatalogService::new(Arc::new(ExperimentCatalog::bundled().unwrap()));
        let missing = ExperimentId::new(404).unwrap();
        assert!(matches!(
            service.get_experiment(missing),
            Err(CatalogServiceError::NotFound(id)) if id == missing
        ));
    }
}
