#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;

pub use catalog::{CatalogError, ExperimentCatalog};
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
