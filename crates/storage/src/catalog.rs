use lab_core::model::{Experiment, ExperimentId};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

const BUNDLED_CATALOG: &str = include_str!("../data/experiments.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate experiment id {0}")]
    DuplicateId(ExperimentId),
}

/// Read-only experiment catalog, kept in file order.
#[derive(Debug, Clone)]
pub struct ExperimentCatalog {
    experiments: Vec<Experiment>,
}

impl ExperimentCatalog {
    /// Load the catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// Load a catalog from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or parse errors.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse a catalog from a JSON array of experiments.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::DuplicateId` if two experiments share an id.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let experiments: Vec<Experiment> = serde_json::from_str(raw)?;
        Self::new(experiments)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two experiments share an id.
    pub fn new(experiments: Vec<Experiment>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(experiments.len());
        for experiment in &experiments {
            if !seen.insert(experiment.id) {
                return Err(CatalogError::DuplicateId(experiment.id));
            }
        }
        Ok(Self { experiments })
    }

    #[must_use]
    pub fn list(&self) -> &[Experiment] {
        &self.experiments
    }

    #[must_use]
    pub fn get(&self, id: ExperimentId) -> Option<&Experiment> {
        self.experiments.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}
